use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKey {
    RequestAborted,
    NetworkError,
    Timeout,
}

impl Locale {
    /// BCP 47 tag sent as `Accept-Language`.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }

    pub fn error_message(self, key: ErrorKey) -> &'static str {
        match self {
            Locale::En => match key {
                ErrorKey::RequestAborted => "The request was interrupted. Please try again.",
                ErrorKey::NetworkError => {
                    "A network error occurred. Please check your connection."
                }
                ErrorKey::Timeout => "The server took too long to respond. Please try again.",
            },
            Locale::Ja => match key {
                ErrorKey::RequestAborted => "リクエストが中断されました。もう一度お試しください。",
                ErrorKey::NetworkError => "ネットワークエラーが発生しました。接続をご確認ください。",
                ErrorKey::Timeout => "サーバーの応答がありません。しばらくしてからお試しください。",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [ErrorKey; 3] = [
        ErrorKey::RequestAborted,
        ErrorKey::NetworkError,
        ErrorKey::Timeout,
    ];

    #[test]
    fn every_locale_covers_every_key() {
        for locale in [Locale::En, Locale::Ja] {
            for key in KEYS {
                assert!(!locale.error_message(key).is_empty());
            }
        }
    }

    #[test]
    fn locales_produce_distinct_messages() {
        for key in KEYS {
            assert_ne!(
                Locale::En.error_message(key),
                Locale::Ja.error_message(key)
            );
        }
    }

    #[test]
    fn tag_round_trips_through_serde() {
        let value = serde_json::to_string(&Locale::Ja).unwrap();
        assert_eq!(value, "\"ja\"");
        let locale: Locale = serde_json::from_str(&value).unwrap();
        assert_eq!(locale.tag(), "ja");
    }
}
