//! Localized user-facing error messages

use serde::{Deserialize, Serialize};

use super::Widget;

/// The message table shown by a widget when an operation fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessages {
    pub network_error: String,
    pub timeout_error: String,
    pub server_error: String,
    pub invalid_response: String,
    pub query_too_short: String,
    pub query_empty: String,
    pub rating_required: String,
}

impl ErrorMessages {
    /// The Arabic message table for a widget
    pub fn for_widget(widget: Widget) -> Self {
        let query_empty = match widget {
            Widget::Educational => "يرجى كتابة استفسارك التعليمي",
            Widget::RealEstate => "يرجى كتابة استفسارك العقاري",
        };

        Self {
            network_error: "حدث خطأ في الاتصال. يرجى التحقق من اتصال الإنترنت والمحاولة مرة أخرى."
                .to_string(),
            timeout_error: "انتهت مهلة الاستجابة. يرجى المحاولة مرة أخرى.".to_string(),
            server_error: "حدث خطأ في الخادم. يرجى المحاولة لاحقاً.".to_string(),
            invalid_response: "استجابة غير صحيحة من الخادم. يرجى المحاولة مرة أخرى.".to_string(),
            query_too_short: "يرجى كتابة استفسار أكثر تفصيلاً (10 أحرف على الأقل)".to_string(),
            query_empty: query_empty.to_string(),
            rating_required: "يرجى اختيار تقييم أولاً".to_string(),
        }
    }
}
