//! Categorical attributes and their integer codes.
//!
//! Each categorical field of a patient record is a closed enum with a fixed
//! label → code table. The codes are the values the model artifacts were
//! fitted on and must never be renumbered.

use std::fmt;

/// Error type for categorical parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("Unknown {field} category: {label:?}")]
    UnknownCategory { field: &'static str, label: String },
}

/// A closed categorical attribute with a stable integer code per variant.
pub trait Categorical: Copy + Sized + 'static {
    /// Human-readable field name (used in errors and form labels).
    const FIELD: &'static str;

    /// All variants, in code order.
    const ALL: &'static [Self];

    /// Integer code fed to the models.
    fn code(self) -> u8;

    /// Display label, identical to the label used by the input form.
    fn label(self) -> &'static str;

    /// Parse a label back into its variant.
    ///
    /// # Errors
    /// Returns `EncodingError::UnknownCategory` for labels outside the set.
    fn from_label(label: &str) -> Result<Self, EncodingError> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.label() == label)
            .ok_or_else(|| EncodingError::UnknownCategory {
                field: Self::FIELD,
                label: label.to_string(),
            })
    }

    /// Model input value (codes are fed as floats like every other column).
    fn feature(self) -> f64 {
        f64::from(self.code())
    }
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl Categorical for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = EncodingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as Categorical>::from_label(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

categorical! {
    /// Race as recorded in the SEER extract.
    Race, "race" {
        White => "White" = 0,
        Black => "Black" = 1,
        Other => "Other" = 2,
    }
}

categorical! {
    /// AJCC primary tumor (T) stage.
    TStage, "T stage" {
        T1 => "T1" = 0,
        T2 => "T2" = 1,
        T3 => "T3" = 2,
        T4 => "T4" = 3,
    }
}

categorical! {
    /// AJCC regional lymph node (N) stage.
    NStage, "N stage" {
        N1 => "N1" = 0,
        N2 => "N2" = 1,
        N3 => "N3" = 2,
    }
}

categorical! {
    /// AJCC 6th edition stage group.
    #[allow(clippy::upper_case_acronyms)]
    SixthStage, "6th stage" {
        IIA => "IIA" = 0,
        IIB => "IIB" = 1,
        IIIA => "IIIA" = 2,
        IIIB => "IIIB" = 3,
        IIIC => "IIIC" = 4,
    }
}

categorical! {
    MaritalStatus, "marital status" {
        Married => "Married" = 0,
        Divorced => "Divorced" = 1,
        Single => "Single" = 2,
        Widowed => "Widowed" = 3,
        Separated => "Separated" = 4,
    }
}

categorical! {
    /// Histological grade. Ordinal, labelled "1" to "4".
    Grade, "grade" {
        G1 => "1" = 0,
        G2 => "2" = 1,
        G3 => "3" = 2,
        G4 => "4" = 3,
    }
}

categorical! {
    /// SEER historic stage A.
    AStage, "A stage" {
        Regional => "Regional" = 0,
        Distant => "Distant" = 1,
    }
}

categorical! {
    EstrogenStatus, "estrogen status" {
        Positive => "Positive" = 0,
        Negative => "Negative" = 1,
    }
}

categorical! {
    ProgesteroneStatus, "progesterone status" {
        Positive => "Positive" = 0,
        Negative => "Negative" = 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_table<T: Categorical + fmt::Debug>(expected: &[(&str, u8)]) {
        assert_eq!(T::ALL.len(), expected.len(), "{} variant count", T::FIELD);
        for (variant, (label, code)) in T::ALL.iter().zip(expected) {
            assert_eq!(variant.label(), *label);
            assert_eq!(variant.code(), *code, "{} {label}", T::FIELD);
            assert_eq!(T::from_label(label).expect("known label").code(), *code);
        }
    }

    fn assert_injective<T: Categorical>() {
        let codes: HashSet<u8> = T::ALL.iter().map(|v| v.code()).collect();
        assert_eq!(codes.len(), T::ALL.len(), "{} codes collide", T::FIELD);
    }

    #[test]
    fn test_code_tables() {
        assert_table::<Race>(&[("White", 0), ("Black", 1), ("Other", 2)]);
        assert_table::<TStage>(&[("T1", 0), ("T2", 1), ("T3", 2), ("T4", 3)]);
        assert_table::<NStage>(&[("N1", 0), ("N2", 1), ("N3", 2)]);
        assert_table::<SixthStage>(&[
            ("IIA", 0),
            ("IIB", 1),
            ("IIIA", 2),
            ("IIIB", 3),
            ("IIIC", 4),
        ]);
        assert_table::<MaritalStatus>(&[
            ("Married", 0),
            ("Divorced", 1),
            ("Single", 2),
            ("Widowed", 3),
            ("Separated", 4),
        ]);
        assert_table::<Grade>(&[("1", 0), ("2", 1), ("3", 2), ("4", 3)]);
        assert_table::<AStage>(&[("Regional", 0), ("Distant", 1)]);
        assert_table::<EstrogenStatus>(&[("Positive", 0), ("Negative", 1)]);
        assert_table::<ProgesteroneStatus>(&[("Positive", 0), ("Negative", 1)]);
    }

    #[test]
    fn test_codes_are_injective() {
        assert_injective::<Race>();
        assert_injective::<TStage>();
        assert_injective::<NStage>();
        assert_injective::<SixthStage>();
        assert_injective::<MaritalStatus>();
        assert_injective::<Grade>();
        assert_injective::<AStage>();
        assert_injective::<EstrogenStatus>();
        assert_injective::<ProgesteroneStatus>();
    }

    #[test]
    fn test_unknown_label_rejected() {
        let err = Race::from_label("Asian").expect_err("not in the set");
        assert_eq!(
            err,
            EncodingError::UnknownCategory {
                field: "race",
                label: "Asian".into()
            }
        );

        // Labels are case-sensitive, matching the form choices exactly.
        assert!("t2".parse::<TStage>().is_err());
        assert!("5".parse::<Grade>().is_err());
        assert!("".parse::<AStage>().is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Grade::G3).expect("serialize");
        assert_eq!(json, "\"3\"");
        let parsed: SixthStage = serde_json::from_str("\"IIIB\"").expect("deserialize");
        assert_eq!(parsed, SixthStage::IIIB);
        assert!(serde_json::from_str::<MaritalStatus>("\"Engaged\"").is_err());
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(Grade::G2.to_string(), "2");
        assert_eq!(NStage::N3.to_string(), "N3");
        assert!((Race::Other.feature() - 2.0).abs() < f64::EPSILON);
    }
}
