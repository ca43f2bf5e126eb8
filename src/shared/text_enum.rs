//! Closed enums stored and exchanged as plain text labels.
//!
//! Every enum declared through [`text_enum!`] carries an extra
//! `Unrecognized(String)` variant holding any label outside the known set, so
//! reading legacy or hand-edited records never fails and callers decide per use
//! site how an unknown label is treated.

/// Declare a text-labelled enum.
///
/// Each variant names its canonical label first, then any legacy labels that
/// may already be stored (`| "..."`). Spellings listed after `;` are accepted
/// only from user input through `FromStr`, which also trims.
///
/// Stored text reads exactly: `"critical"` in a record stays
/// `Unrecognized("critical")` even when the input parser maps it to `Critical`.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $label:literal $(| $alias:literal)* $(; $($input:literal)|+)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// Label outside the known set, kept verbatim
            Unrecognized(String),
        }

        #[allow(dead_code)]
        impl $name {
            /// All recognized variants in declaration order
            pub fn known() -> Vec<$name> {
                vec![$($name::$variant),+]
            }

            /// Canonical label, or the raw text for unrecognized values
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unrecognized(raw) => raw.as_str(),
                }
            }

            /// Read a stored label; anything but an exact known label is kept as is
            pub fn parse(raw: &str) -> Self {
                match raw {
                    $($label $(| $alias)* => $name::$variant,)+
                    _ => $name::Unrecognized(raw.to_string()),
                }
            }

            pub fn is_recognized(&self) -> bool {
                !matches!(self, $name::Unrecognized(_))
            }

            /// Position among the recognized variants
            pub fn ordinal(&self) -> Option<usize> {
                Self::known().iter().position(|known| known == self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::Unrecognized(String::new())
            }
        }

        /// Parse user input: trimmed, input spellings allowed, unknown labels rejected
        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw.trim() {
                    $($label $(| $alias)* $($(| $input)+)? => Ok($name::$variant),)+
                    _ => Err(format!(
                        "Unknown {} '{}', expected one of: {}",
                        stringify!($name),
                        raw,
                        [$($label),+].join(", ")
                    )),
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::parse(&raw)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::parse(raw)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unrecognized(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

pub(crate) use text_enum;

#[cfg(test)]
mod tests {
    use super::text_enum;

    text_enum! {
        /// Fixture enum
        pub enum Colour {
            Red => "Red" | "Rouge"; "red",
            LightBlue => "Light Blue",
        }
    }

    #[test]
    fn test_stored_labels_read_exactly() {
        assert_eq!(Colour::parse("Red"), Colour::Red);
        assert_eq!(Colour::parse("Rouge"), Colour::Red);
        assert_eq!(Colour::parse("Light Blue"), Colour::LightBlue);
        assert_eq!(Colour::parse("red"), Colour::Unrecognized("red".to_string()));
        assert_eq!(
            Colour::parse(" Light Blue "),
            Colour::Unrecognized(" Light Blue ".to_string())
        );
    }

    #[test]
    fn test_unknown_label_is_preserved() {
        let colour = Colour::parse("Magenta");
        assert_eq!(colour, Colour::Unrecognized("Magenta".to_string()));
        assert!(!colour.is_recognized());
        assert_eq!(colour.as_str(), "Magenta");
        assert_eq!(colour.ordinal(), None);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Colour::LightBlue).unwrap();
        assert_eq!(json, "\"Light Blue\"");

        let back: Colour = serde_json::from_str("\"Rouge\"").unwrap();
        assert_eq!(back, Colour::Red);

        let lowercase: Colour = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(serde_json::to_string(&lowercase).unwrap(), "\"red\"");
    }

    #[test]
    fn test_input_parsing_accepts_input_spellings() {
        assert_eq!(" red ".parse::<Colour>(), Ok(Colour::Red));
        assert_eq!("Rouge".parse::<Colour>(), Ok(Colour::Red));
        assert_eq!(" Light Blue".parse::<Colour>(), Ok(Colour::LightBlue));
        let err = "Teal".parse::<Colour>().unwrap_err();
        assert!(err.contains("Red, Light Blue"));
    }

    #[test]
    fn test_ordinal_follows_declaration_order() {
        assert_eq!(Colour::Red.ordinal(), Some(0));
        assert_eq!(Colour::LightBlue.ordinal(), Some(1));
        assert_eq!(Colour::known().len(), 2);
    }
}
