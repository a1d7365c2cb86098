//! Canned answers for each widget, in match priority order

use crate::config::Widget;

/// One keyword entry of a fallback table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedAnswer {
    pub keyword: &'static str,
    pub answer: &'static str,
    pub recommendations: &'static [&'static str],
}

/// A widget's keyword table plus its generic default
#[derive(Debug, Clone, Copy)]
pub struct FallbackTable {
    pub entries: &'static [CannedAnswer],
    pub default_answer: &'static str,
    pub default_recommendations: &'static [&'static str],
}

impl FallbackTable {
    pub fn for_widget(widget: Widget) -> &'static FallbackTable {
        match widget {
            Widget::Educational => &EDUCATIONAL,
            Widget::RealEstate => &REAL_ESTATE,
        }
    }
}

// Specific study topics come before the broad "مهارات" and "تعلم" entries,
// so "مهاراتي في الكتابة" resolves to the writing advice.
static EDUCATIONAL: FallbackTable = FallbackTable {
    entries: &[
        CannedAnswer {
            keyword: "كتابة",
            answer: "تطوير مهارات الكتابة الأكاديمية يتطلب التدريب على التنظيم والوضوح. ابدأ بوضع مخطط واضح، ثم اكتب بأسلوب منطقي ومترابط.",
            recommendations: &[
                "ضع مخططاً قبل بدء الكتابة",
                "استخدم جملاً واضحة ومباشرة",
                "راجع وحرر نصوصك بعناية",
            ],
        },
        CannedAnswer {
            keyword: "قراءة",
            answer: "تحسين مهارات القراءة يتطلب الممارسة المنتظمة وتنويع المواد المقروءة. ركز على فهم المعنى العام أولاً، ثم انتقل للتفاصيل.",
            recommendations: &[
                "اقرأ بانتظام من مصادر متنوعة",
                "استخدم تقنية القراءة التدريجية",
                "لخص ما تقرأ لتعزيز الفهم",
            ],
        },
        CannedAnswer {
            keyword: "امتحان",
            answer: "للاستعداد للامتحانات بفعالية، ابدأ مبكراً وضع خطة مراجعة تدريجية. استخدم أساليب متنوعة مثل الملخصات، الخرائط الذهنية، والاختبارات التجريبية.",
            recommendations: &[
                "ابدأ الاستعداد مبكراً مع خطة واضحة",
                "استخدم الخرائط الذهنية والملخصات",
                "مارس الاختبارات التجريبية",
            ],
        },
        CannedAnswer {
            keyword: "بحث",
            answer: "البحث العلمي يتطلب منهجية واضحة ومصادر موثقة. ابدأ بتحديد موضوع البحث بدقة، ثم اجمع المصادر من قواعد البيانات الأكاديمية الموثوقة.",
            recommendations: &[
                "حدد موضوع البحث بدقة ووضوح",
                "استخدم قواعد البيانات الأكاديمية الموثوقة",
                "وثق المصادر بطريقة علمية صحيحة",
            ],
        },
        CannedAnswer {
            keyword: "مهارات",
            answer: "تطوير المهارات الأكاديمية يتطلب الممارسة المستمرة والتقييم الذاتي. ركز على مهارات التفكير النقدي، القراءة السريعة، وإدارة الوقت.",
            recommendations: &[
                "مارس مهارات التفكير النقدي بانتظام",
                "تعلم تقنيات القراءة السريعة والفهم",
                "طور مهارات إدارة الوقت والتنظيم",
            ],
        },
        CannedAnswer {
            keyword: "تعلم",
            answer: "التعلم الفعال يتطلب التنظيم والتخطيط. أنصحك بوضع جدول زمني محدد وتقسيم المواد إلى أجزاء صغيرة قابلة للإدارة. استخدم تقنيات مثل التكرار المتباعد والتعلم النشط.",
            recommendations: &[
                "ضع جدولاً زمنياً واضحاً للدراسة",
                "استخدم تقنية البومودورو (25 دقيقة دراسة + 5 دقائق راحة)",
                "اعتمد على التعلم النشط بدلاً من القراءة السلبية",
            ],
        },
    ],
    default_answer: "بناءً على استفسارك التعليمي، أنصحك بالتشاور مع معلم متخصص للحصول على إرشاد مفصل. هذه إجابة مبدئية تهدف إلى توجيهك في الاتجاه الصحيح.",
    default_recommendations: &[
        "حدد أهدافك التعليمية بوضوح",
        "استشر معلمين متخصصين في المجال",
        "استخدم مصادر تعليمية متنوعة وموثوقة",
    ],
};

static REAL_ESTATE: FallbackTable = FallbackTable {
    entries: &[
        CannedAnswer {
            keyword: "استثمار",
            answer: "الاستثمار العقاري الناجح يبدأ بدراسة الموقع والطلب في المنطقة. قارن العائد الإيجاري المتوقع بتكلفة الشراء، وضع في الحسبان تكاليف الصيانة والرسوم.",
            recommendations: &[
                "ادرس الطلب والعرض في الحي المستهدف",
                "احسب العائد الإيجاري الصافي بعد المصاريف",
                "نوّع استثماراتك ولا تضع كل رأس المال في عقار واحد",
            ],
        },
        CannedAnswer {
            keyword: "تمويل",
            answer: "قبل اختيار التمويل العقاري قارن بين عروض البنوك من حيث نسبة الربح ومدة السداد والرسوم الإدارية، وتأكد أن القسط الشهري لا يتجاوز ثلث دخلك.",
            recommendations: &[
                "قارن عروض التمويل من أكثر من جهة",
                "احسب القسط الشهري مقارنة بدخلك",
                "اقرأ شروط السداد المبكر بعناية",
            ],
        },
        CannedAnswer {
            keyword: "إيجار",
            answer: "عند الإيجار احرص على توثيق العقد عبر المنصات الرسمية وتحديد مدة الإيجار وطريقة الدفع ومسؤوليات الصيانة بوضوح.",
            recommendations: &[
                "وثّق عقد الإيجار عبر المنصة الرسمية",
                "عاين العقار وسجل حالته قبل الاستلام",
                "حدد مسؤوليات الصيانة في العقد",
            ],
        },
        CannedAnswer {
            keyword: "شقة",
            answer: "عند شراء شقة تحقق من جودة البناء وعمر المبنى وخدمات الحي، واطلب صك الملكية ومخطط الوحدة قبل دفع أي مبلغ.",
            recommendations: &[
                "افحص الشقة بواسطة مهندس مختص",
                "تحقق من صك الملكية وخلوه من الرهن",
                "اسأل عن رسوم اتحاد الملاك والخدمات",
            ],
        },
        CannedAnswer {
            keyword: "فيلا",
            answer: "شراء الفيلا قرار طويل الأمد؛ قيّم مساحة الأرض ونسبة البناء وجودة التشطيب، وقارن السعر بأسعار الفلل المماثلة في نفس المخطط.",
            recommendations: &[
                "قارن السعر بصفقات مماثلة حديثة",
                "افحص العزل والتمديدات قبل الشراء",
                "تأكد من مطابقة البناء للرخصة",
            ],
        },
        CannedAnswer {
            keyword: "أرض",
            answer: "قبل شراء أرض تحقق من نظام البناء المسموح واستخدام الأرض في المخطط المعتمد، وتأكد من توفر الخدمات والبنية التحتية.",
            recommendations: &[
                "راجع المخطط المعتمد ونظام البناء",
                "تحقق من توفر الخدمات والطرق",
                "استخرج إفادة رسمية بحالة الصك",
            ],
        },
    ],
    default_answer: "بناءً على استفسارك العقاري، أنصحك بالتشاور مع وسيط عقاري مرخص للحصول على تقييم مفصل. هذه إجابة مبدئية تهدف إلى توجيهك في الاتجاه الصحيح.",
    default_recommendations: &[
        "حدد ميزانيتك وأهدافك العقارية بوضوح",
        "استشر وسيطاً عقارياً مرخصاً",
        "قارن الأسعار في أكثر من مصدر موثوق",
    ],
};
