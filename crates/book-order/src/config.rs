//! Account, shipping and payment settings, loaded once from the environment.
//!
//! `.env` (or an explicit env file) is read into the process environment with
//! `dotenvy`; validation itself works on any key/value source so tests can
//! build configurations without touching process state.

use crate::money::{ParseMoneyError, PriceLimit};
use book_format::{FormatError, PrintOptions};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Keys
// =============================================================================

pub const LULU_USERNAME: &str = "LULU_USERNAME";
pub const LULU_PASSWORD: &str = "LULU_PASSWORD";
pub const LULU_PAYMENT_TOKEN: &str = "LULU_PAYMENT_TOKEN";
pub const LULU_API_URL: &str = "LULU_API_URL";
pub const LULU_TIMEOUT_SECS: &str = "LULU_TIMEOUT_SECS";
pub const LULU_BINDING: &str = "LULU_BINDING";
pub const LULU_INTERIOR_COLOR: &str = "LULU_INTERIOR_COLOR";
pub const LULU_PAPER: &str = "LULU_PAPER";
pub const LULU_COVER_FINISH: &str = "LULU_COVER_FINISH";
pub const LULU_SHIPPING_LEVEL: &str = "LULU_SHIPPING_LEVEL";
pub const LULU_BOOK_CATEGORY: &str = "LULU_BOOK_CATEGORY";
pub const LULU_MAX_PRICE: &str = "LULU_MAX_PRICE";

pub const SHIP_NAME: &str = "SHIP_NAME";
pub const SHIP_STREET1: &str = "SHIP_STREET1";
pub const SHIP_STREET2: &str = "SHIP_STREET2";
pub const SHIP_CITY: &str = "SHIP_CITY";
pub const SHIP_STATE: &str = "SHIP_STATE";
pub const SHIP_POSTCODE: &str = "SHIP_POSTCODE";
pub const SHIP_COUNTRY: &str = "SHIP_COUNTRY";
pub const SHIP_PHONE: &str = "SHIP_PHONE";
pub const SHIP_EMAIL: &str = "SHIP_EMAIL";

pub const DEFAULT_API_URL: &str = "https://api.lulu.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SHIPPING_LEVEL: &str = "MAIL";
pub const DEFAULT_BOOK_CATEGORY: &str = "Fiction";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("Could not read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

// =============================================================================
// Settings
// =============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Stored payment method, referenced by token
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentMethod {
    pub token: String,
}

impl fmt::Debug for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentMethod")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingAddress {
    pub name: String,
    pub street1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    pub city: String,
    #[serde(rename = "state_code", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub postcode: String,
    #[serde(rename = "country_code")]
    pub country: String,
    #[serde(rename = "phone_number", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    /// Per-request timeout; a stalled request fails the step it belongs to
    pub timeout: Duration,
}

/// Everything the order needs besides the book itself
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfig {
    pub credentials: Credentials,
    pub payment: PaymentMethod,
    pub shipping: ShippingAddress,
    pub api: ApiSettings,
    pub print: PrintOptions,
    pub shipping_level: String,
    pub category: String,
    pub max_price: Option<PriceLimit>,
}

impl OrderConfig {
    /// Read `env_file` (or `.env` in the working directory, if present) into
    /// the process environment, then validate it.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path)?;
                log::debug!("Loaded settings from {}", path.display());
            }
            None => match dotenvy::dotenv() {
                Ok(path) => log::debug!("Loaded settings from {}", path.display()),
                Err(e) if e.not_found() => log::debug!("No .env file, using process environment"),
                Err(e) => return Err(e.into()),
            },
        }
        Self::from_vars(std::env::vars())
    }

    /// Validate settings from any key/value source
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = Vars(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );

        let credentials = Credentials {
            username: vars.required(LULU_USERNAME)?,
            password: vars.required(LULU_PASSWORD)?,
        };
        let payment = PaymentMethod {
            token: vars.required(LULU_PAYMENT_TOKEN)?,
        };
        let shipping = ShippingAddress {
            name: vars.required(SHIP_NAME)?,
            street1: vars.required(SHIP_STREET1)?,
            street2: vars.optional(SHIP_STREET2),
            city: vars.required(SHIP_CITY)?,
            state: vars.optional(SHIP_STATE),
            postcode: vars.required(SHIP_POSTCODE)?,
            country: vars.country_code()?,
            phone: vars.optional(SHIP_PHONE),
            email: vars.optional(SHIP_EMAIL),
        };

        let timeout_secs: u64 = vars.parsed(LULU_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: LULU_TIMEOUT_SECS,
                reason: "must be at least 1 second".to_string(),
            });
        }
        let api = ApiSettings {
            base_url: vars
                .optional(LULU_API_URL)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(timeout_secs),
        };

        let defaults = PrintOptions::default();
        let print = PrintOptions {
            binding: vars.option(LULU_BINDING, defaults.binding)?,
            color: vars.option(LULU_INTERIOR_COLOR, defaults.color)?,
            paper: vars.option(LULU_PAPER, defaults.paper)?,
            finish: vars.option(LULU_COVER_FINISH, defaults.finish)?,
        };

        let max_price = vars
            .optional(LULU_MAX_PRICE)
            .map(|value| PriceLimit::parse(&value))
            .transpose()
            .map_err(|e: ParseMoneyError| ConfigError::Invalid {
                key: LULU_MAX_PRICE,
                reason: e.to_string(),
            })?;

        Ok(Self {
            credentials,
            payment,
            shipping,
            api,
            print,
            shipping_level: vars
                .optional(LULU_SHIPPING_LEVEL)
                .map(|level| level.to_ascii_uppercase())
                .unwrap_or_else(|| DEFAULT_SHIPPING_LEVEL.to_string()),
            category: vars
                .optional(LULU_BOOK_CATEGORY)
                .unwrap_or_else(|| DEFAULT_BOOK_CATEGORY.to_string()),
            max_price,
        })
    }
}

// =============================================================================
// Lookup Helpers
// =============================================================================

struct Vars(HashMap<String, String>);

impl Vars {
    /// Trimmed, non-empty value
    fn optional(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing(key))
    }

    fn parsed<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.optional(key) {
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    fn option<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr<Err = FormatError>,
    {
        self.parsed(key, default)
    }

    /// Two-letter ISO country code
    fn country_code(&self) -> Result<String, ConfigError> {
        let country = self.required(SHIP_COUNTRY)?.to_ascii_uppercase();
        if country.len() == 2 && country.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(country)
        } else {
            Err(ConfigError::Invalid {
                key: SHIP_COUNTRY,
                reason: format!("expected a two-letter country code, got {:?}", country),
            })
        }
    }
}
