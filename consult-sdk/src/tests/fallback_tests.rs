//! Tests for the local keyword responder

#[cfg(test)]
mod tests {
    use crate::config::Widget;
    use crate::services::fallback::{
        FallbackTable, LocalResponder, DEFAULT_CONFIDENCE, FALLBACK_MODEL,
        KEYWORD_MATCH_CONFIDENCE,
    };

    #[test]
    fn test_first_matching_keyword_wins() {
        let responder = LocalResponder::new(Widget::Educational);

        // Both "مهارات" and "كتابة" appear; the writing entry is listed first
        let entry = responder.matching_entry("مهاراتي في الكتابة").unwrap();
        assert_eq!(entry.keyword, "كتابة");

        let answer = responder.respond("مهاراتي في الكتابة");
        assert_eq!(answer.answer, entry.answer);
        assert_eq!(answer.confidence, KEYWORD_MATCH_CONFIDENCE);
        assert_eq!(answer.model, FALLBACK_MODEL);
    }

    #[test]
    fn test_keyword_matches_inside_words() {
        let responder = LocalResponder::new(Widget::RealEstate);

        let entry = responder.matching_entry("هل الاستثمار في الأراضي مربح؟").unwrap();
        assert_eq!(entry.keyword, "استثمار");

        let entry = responder.matching_entry("أحتاج إلى تمويل لشراء منزل").unwrap();
        assert_eq!(entry.keyword, "تمويل");
    }

    #[test]
    fn test_default_answer_without_keyword() {
        for widget in [Widget::Educational, Widget::RealEstate] {
            let responder = LocalResponder::new(widget);
            let table = FallbackTable::for_widget(widget);

            let answer = responder.respond("سؤال عام لا يحتوي أي كلمة مفتاحية");
            assert_eq!(answer.answer, table.default_answer);
            assert_eq!(answer.recommendations.len(), table.default_recommendations.len());
            assert_eq!(answer.confidence, DEFAULT_CONFIDENCE);
            assert_eq!(answer.model, FALLBACK_MODEL);
        }
    }

    #[test]
    fn test_every_entry_has_recommendations() {
        for widget in [Widget::Educational, Widget::RealEstate] {
            let table = FallbackTable::for_widget(widget);
            assert!(!table.entries.is_empty());
            for entry in table.entries {
                assert!(!entry.answer.is_empty());
                assert_eq!(entry.recommendations.len(), 3, "keyword {}", entry.keyword);
            }
        }
    }

    #[test]
    fn test_responses_are_deterministic() {
        let responder = LocalResponder::new(Widget::Educational);
        let query = "كيف أستعد للامتحان بشكل جيد؟";
        assert_eq!(responder.respond(query), responder.respond(query));
    }
}
