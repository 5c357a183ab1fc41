//! Closed enumerations with an `Unknown` fallback.
//!
//! The service adds enum values over time. Every enum here decodes from either
//! its integer code or its `SCREAMING_SNAKE_CASE` name, and maps anything it
//! does not recognize to `Unknown` with a warning instead of failing the
//! whole response.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Visitor;
use std::fmt;
use std::marker::PhantomData;
use tracing::warn;

/// Integer code written for an `Unknown` value.
pub const UNKNOWN_CODE: i64 = -1;

/// Name written for an `Unknown` value.
pub const UNKNOWN_NAME: &str = "UNKNOWN";

/// An enumeration with a wire table and a reserved fallback variant.
pub trait WireEnum: Sized + Copy + PartialEq + fmt::Debug + 'static {
    /// Type name used in diagnostics.
    const TYPE_NAME: &'static str;

    /// The fallback variant. Never transmitted by the service.
    const UNKNOWN: Self;

    /// Known variants with their integer code and wire name.
    const VARIANTS: &'static [(Self, i64, &'static str)];

    /// Serialize as the integer code instead of the name.
    const SERIALIZE_AS_CODE: bool;

    /// Look up a variant by integer code.
    fn from_code(code: i64) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(v, _, _)| *v)
    }

    /// Look up a variant by wire name.
    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(_, _, n)| *n == name)
            .map(|(v, _, _)| *v)
    }

    /// Decode an integer code, falling back to `UNKNOWN`.
    fn decode_code(code: i64) -> Self {
        Self::from_code(code).unwrap_or_else(|| {
            warn!(
                enum_type = Self::TYPE_NAME,
                value = code,
                "Unrecognized enum value, using Unknown"
            );
            Self::UNKNOWN
        })
    }

    /// Decode a wire name, falling back to `UNKNOWN`.
    fn decode_name(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(
                enum_type = Self::TYPE_NAME,
                value = name,
                "Unrecognized enum value, using Unknown"
            );
            Self::UNKNOWN
        })
    }

    /// Integer code of this value.
    fn code(self) -> i64 {
        Self::VARIANTS
            .iter()
            .find(|(v, _, _)| *v == self)
            .map_or(UNKNOWN_CODE, |(_, c, _)| *c)
    }

    /// Wire name of this value.
    fn name(self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(v, _, _)| *v == self)
            .map_or(UNKNOWN_NAME, |(_, _, n)| *n)
    }

    /// Check if this is the fallback variant.
    fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }
}

struct FallbackVisitor<T>(PhantomData<T>);

impl<T: WireEnum> Visitor<'_> for FallbackVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an integer or string {} value", T::TYPE_NAME)
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<T, E> {
        Ok(T::decode_code(v))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<T, E> {
        match i64::try_from(v) {
            Ok(code) => Ok(T::decode_code(code)),
            Err(_) => {
                warn!(
                    enum_type = T::TYPE_NAME,
                    value = v,
                    "Unrecognized enum value, using Unknown"
                );
                Ok(T::UNKNOWN)
            }
        }
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<T, E> {
        Ok(T::decode_name(v))
    }
}

/// Deserialize a [`WireEnum`] from an integer or string.
///
/// Other JSON types (bool, float, object, ...) are type errors.
pub fn deserialize_fallback<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: WireEnum,
{
    deserializer.deserialize_any(FallbackVisitor(PhantomData))
}

/// Serialize a [`WireEnum`] in its canonical wire form.
pub fn serialize_wire<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: WireEnum,
{
    if T::SERIALIZE_AS_CODE {
        serializer.serialize_i64(value.code())
    } else {
        serializer.serialize_str(value.name())
    }
}

macro_rules! wire_enum {
    (@as_code code) => { true };
    (@as_code name) => { false };
    (
        $(#[$meta:meta])*
        pub enum $name:ident: serialize as $repr:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = ($code:expr, $wire:literal),
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
            /// A value not recognized by this version of the crate.
            Unknown,
        }

        impl WireEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const UNKNOWN: Self = Self::Unknown;
            const VARIANTS: &'static [(Self, i64, &'static str)] =
                &[$((Self::$variant, $code, $wire),)*];
            const SERIALIZE_AS_CODE: bool = wire_enum!(@as_code $repr);
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serialize_wire(self, serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_fallback(deserializer)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(WireEnum::name(*self))
            }
        }
    };
}

wire_enum! {
    /// The reason why the model stopped generating tokens.
    pub enum FinishReason: serialize as code {
        /// Default value, not used by the service.
        Unspecified = (0, "FINISH_REASON_UNSPECIFIED"),
        /// Natural stop point or a provided stop sequence.
        Stop = (1, "STOP"),
        /// The requested token limit was reached.
        MaxTokens = (2, "MAX_TOKENS"),
        /// The candidate was flagged for safety reasons.
        Safety = (3, "SAFETY"),
        /// The candidate was flagged for recitation.
        Recitation = (4, "RECITATION"),
        Other = (5, "OTHER"),
    }
}

wire_enum! {
    /// The reason why a prompt was blocked.
    pub enum BlockReason: serialize as name {
        Unspecified = (0, "BLOCK_REASON_UNSPECIFIED"),
        /// The prompt was blocked for safety reasons.
        Safety = (1, "SAFETY"),
        Other = (2, "OTHER"),
    }
}

wire_enum! {
    /// Harm category for safety ratings.
    pub enum HarmCategory: serialize as name {
        Unspecified = (0, "HARM_CATEGORY_UNSPECIFIED"),
        Derogatory = (1, "HARM_CATEGORY_DEROGATORY"),
        Toxicity = (2, "HARM_CATEGORY_TOXICITY"),
        Violence = (3, "HARM_CATEGORY_VIOLENCE"),
        Sexual = (4, "HARM_CATEGORY_SEXUAL"),
        Medical = (5, "HARM_CATEGORY_MEDICAL"),
        Dangerous = (6, "HARM_CATEGORY_DANGEROUS"),
        Harassment = (7, "HARM_CATEGORY_HARASSMENT"),
        HateSpeech = (8, "HARM_CATEGORY_HATE_SPEECH"),
        SexuallyExplicit = (9, "HARM_CATEGORY_SEXUALLY_EXPLICIT"),
        DangerousContent = (10, "HARM_CATEGORY_DANGEROUS_CONTENT"),
    }
}

wire_enum! {
    /// Harm probability levels.
    pub enum HarmProbability: serialize as name {
        Unspecified = (0, "HARM_PROBABILITY_UNSPECIFIED"),
        Negligible = (1, "NEGLIGIBLE"),
        Low = (2, "LOW"),
        Medium = (3, "MEDIUM"),
        High = (4, "HIGH"),
    }
}

#[cfg(test)]
#[path = "enums.test.rs"]
mod tests;
