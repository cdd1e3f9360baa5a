//! Localized validation messages.
//!
//! Rules describe what went wrong with a [`Message`]; a [`Catalog`] turns it
//! into text for the request's [`Lang`]. [`BuiltinCatalog`] ships English
//! (the default) and Arabic. Supply your own catalog to
//! [`Filters::with_catalog`](crate::Filters::with_catalog) to add languages
//! without touching rule logic.

use std::fmt;

/// Language selected by the request's language tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Lang {
    /// English, used for every unrecognized tag.
    #[default]
    En,
    /// Arabic (`"ar"`).
    Ar,
}

impl Lang {
    /// Map a two-letter tag to a language. Anything but `"ar"` is English.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ar" => Self::Ar,
            _ => Self::En,
        }
    }

    /// The two-letter tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every kind of validation failure, with the parameters its text embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Message<'a> {
    /// Integer rule value does not parse.
    InvalidNumber,
    /// Integer below the configured minimum.
    NumberTooSmall {
        /// Configured minimum.
        min: i64,
    },
    /// Integer above the configured maximum.
    NumberTooLarge {
        /// Configured maximum.
        max: i64,
    },
    /// String longer than the configured maximum.
    TextTooLong {
        /// Configured maximum length.
        max: usize,
        /// Length of the submitted value.
        actual: usize,
    },
    /// More checkbox values than available options.
    TooManyOptions {
        /// Number of configured options.
        available: usize,
    },
    /// Checkbox element is not an integer.
    NotANumber,
    /// Checkbox integer outside the allowed set.
    NumberNotOneOf {
        /// Allowed options, comma-joined.
        options: &'a str,
    },
    /// Checkbox string outside the allowed set.
    OptionNotOneOf {
        /// Allowed options, comma-joined.
        options: &'a str,
    },
    /// Date is not `YYYY-MM-DD`.
    InvalidDate,
    /// Date earlier than the lower bound.
    DateTooEarly {
        /// Formatted bound.
        bound: &'a str,
        /// Formatted input.
        input: &'a str,
    },
    /// Date later than the upper bound.
    DateTooLate {
        /// Formatted bound.
        bound: &'a str,
        /// Formatted input.
        input: &'a str,
    },
    /// `$order_by` is not an allowed column.
    ColumnNotOneOf {
        /// Allowed columns, comma-joined.
        columns: &'a str,
    },
    /// `$page` does not parse.
    InvalidPage,
    /// `$limit` does not parse.
    InvalidLimit,
    /// `$limit` given without `$page`.
    MissingPage,
    /// `$page` given without `$limit`.
    MissingLimit,
    /// `$limit` below the configured minimum.
    LimitTooSmall {
        /// Configured minimum.
        min: i64,
    },
    /// `$limit` above the configured maximum.
    LimitTooLarge {
        /// Configured maximum.
        max: i64,
    },
}

/// Source of localized message text.
pub trait Catalog {
    /// Render `message` in `lang`.
    fn render(&self, message: &Message<'_>, lang: Lang) -> String;
}

/// English and Arabic messages.
#[derive(Debug, Clone, Copy, Default)]
#[allow(clippy::exhaustive_structs)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    fn english(message: &Message<'_>) -> String {
        match *message {
            Message::InvalidNumber => "invalid number".to_string(),
            Message::NumberTooSmall { min } => {
                format!("The number should be greater than or equal to {min}")
            },
            Message::NumberTooLarge { max } => {
                format!("The number should be less than or equal to {max}")
            },
            Message::TextTooLong { max, actual } => format!(
                "Should shorten this text to {max} characters (you are currently using {actual} characters)"
            ),
            Message::TooManyOptions { available } => {
                format!("The number of options available ({available}) cannot be exceeded")
            },
            Message::NotANumber => "This is not a number".to_string(),
            Message::NumberNotOneOf { options } => {
                format!("The number should be one of: ({options})")
            },
            Message::OptionNotOneOf { options } => {
                format!("The option should be one of: ({options})")
            },
            Message::InvalidDate => "The date is invalid".to_string(),
            Message::DateTooEarly { bound, input } => {
                format!("The date should be after ({bound}), the date you entered ({input})")
            },
            Message::DateTooLate { bound, input } => {
                format!("The date should be before ({bound}), the date you entered ({input})")
            },
            Message::ColumnNotOneOf { columns } => {
                format!("Should select one of the following: ({columns})")
            },
            Message::InvalidPage => "Page number is invalid".to_string(),
            Message::InvalidLimit => "The limit is invalid".to_string(),
            Message::MissingPage => "Page number is missing".to_string(),
            Message::MissingLimit => "The limit is missing".to_string(),
            Message::LimitTooSmall { min } => format!("The limit should be at least {min}"),
            Message::LimitTooLarge { max } => format!("The limit should not exceed {max}"),
        }
    }

    fn arabic(message: &Message<'_>) -> String {
        match *message {
            Message::InvalidNumber => "عدد غير صالح".to_string(),
            Message::NumberTooSmall { min } => {
                format!("يجب أن يكون العدد أكبر من أو يساوي {min}")
            },
            Message::NumberTooLarge { max } => {
                format!("يجب أن يكون العدد أصغر من أو يساوي {max}")
            },
            Message::TextTooLong { max, actual } => format!(
                "يجب تقصير هذا النص إلى {max} من الحروف أو أقل (أنت حاليا تستخدم {actual} من الحروف)"
            ),
            Message::TooManyOptions { available } => {
                format!("لا يمكن تجاوز عدد الخيارات المتاحة ({available})")
            },
            Message::NotANumber => "هذا ليس عددا".to_string(),
            Message::NumberNotOneOf { options } => {
                format!("يجب أن يكون العدد واحد من: ({options})")
            },
            Message::OptionNotOneOf { options } => {
                format!("يجب أن يكون الخيار واحد من: ({options})")
            },
            Message::InvalidDate => "التاريخ غير صالح".to_string(),
            Message::DateTooEarly { bound, input } => {
                format!("يجب أن يكون التاريخ بعد ({bound}), التاريخ الذي أدخلته ({input})")
            },
            Message::DateTooLate { bound, input } => {
                format!("يجب أن يكون التاريخ قبل ({bound}), التاريخ الذي أدخلته ({input})")
            },
            Message::ColumnNotOneOf { columns } => {
                format!("يجب اختيار واحد مما يلي: ({columns})")
            },
            Message::InvalidPage => "رقم الصفحة غير صالح".to_string(),
            Message::InvalidLimit => "الحد غير صالح".to_string(),
            Message::MissingPage => "رقم الصفحة مفقود".to_string(),
            Message::MissingLimit => "الحد مفقود".to_string(),
            Message::LimitTooSmall { min } => format!("يجب أن يكون الحد {min} على الأقل"),
            Message::LimitTooLarge { max } => format!("يجب ألا يتجاوز الحد {max}"),
        }
    }
}

impl Catalog for BuiltinCatalog {
    fn render(&self, message: &Message<'_>, lang: Lang) -> String {
        match lang {
            Lang::Ar => Self::arabic(message),
            Lang::En => Self::english(message),
        }
    }
}

/// Language plus catalog, handed to every rule for one request.
#[derive(Clone, Copy)]
pub struct Locale<'a> {
    lang: Lang,
    catalog: &'a dyn Catalog,
}

impl<'a> Locale<'a> {
    /// Pair a language with a catalog.
    #[must_use]
    pub fn new(lang: Lang, catalog: &'a dyn Catalog) -> Self {
        Self { lang, catalog }
    }

    /// Language of this request.
    #[must_use]
    pub const fn lang(&self) -> Lang {
        self.lang
    }

    /// Render a message in this request's language.
    #[must_use]
    pub fn message(&self, message: Message<'_>) -> String {
        self.catalog.render(&message, self.lang)
    }
}

impl fmt::Debug for Locale<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locale")
            .field("lang", &self.lang)
            .finish_non_exhaustive()
    }
}
