use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub member_since: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBalance {
    pub total: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub default_currency: String,
    pub notifications: bool,
}

/// Typed patches: each field present is applied, absent fields are kept.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BalancePatch {
    pub total: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub default_currency: Option<String>,
    pub notifications: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserState {
    pub profile: UserProfile,
    pub balance: UserBalance,
    pub settings: UserSettings,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            profile: UserProfile {
                id: "usr_001".to_string(),
                name: "Demo User".to_string(),
                email: "demo@findash.dev".to_string(),
                member_since: NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"),
            },
            balance: UserBalance {
                total: dec!(12450.00),
                currency: "EUR".to_string(),
            },
            settings: UserSettings {
                default_currency: "EUR".to_string(),
                notifications: true,
            },
        }
    }
}

impl UserState {
    pub fn update_profile(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name {
            self.profile.name = name;
        }
        if let Some(email) = patch.email {
            self.profile.email = email;
        }
    }

    pub fn update_balance(&mut self, patch: BalancePatch) {
        if let Some(total) = patch.total {
            self.balance.total = total;
        }
        if let Some(currency) = patch.currency {
            self.balance.currency = currency;
        }
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        if let Some(default_currency) = patch.default_currency {
            self.settings.default_currency = default_currency;
        }
        if let Some(notifications) = patch.notifications {
            self.settings.notifications = notifications;
        }
    }
}
