//! Customer profile input record
//!
//! Every categorical field is a closed enum whose serde names are the
//! literal labels the encoders were fitted on, so an out-of-domain string
//! never reaches the encoder. The two numeric fields carry declared bounds
//! and defaults; the only permissible input correction is range clamping.
//! `TotalCharges` is derived, never entered.

use serde::{Deserialize, Serialize};

use crate::errors::{ChurnError, ChurnResult};

/// Tenure bounds in months
pub const TENURE_MIN: u32 = 0;
pub const TENURE_MAX: u32 = 72;
pub const TENURE_DEFAULT: u32 = 12;

/// Monthly charges bounds
pub const MONTHLY_CHARGES_MIN: f64 = 0.0;
pub const MONTHLY_CHARGES_MAX: f64 = 150.0;
pub const MONTHLY_CHARGES_STEP: f64 = 0.5;
pub const MONTHLY_CHARGES_DEFAULT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Binary code used at training time: Male 0, Female 1
    pub fn code(&self) -> f64 {
        match self {
            Gender::Male => 0.0,
            Gender::Female => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub const ALL: [YesNo; 2] = [YesNo::Yes, YesNo::No];

    /// Binary code used at training time: Yes 1, No 0
    pub fn code(&self) -> f64 {
        match self {
            YesNo::Yes => 1.0,
            YesNo::No => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultipleLines {
    No,
    Yes,
    #[serde(rename = "No phone service")]
    NoPhoneService,
}

impl MultipleLines {
    pub const ALL: [MultipleLines; 3] = [
        MultipleLines::No,
        MultipleLines::Yes,
        MultipleLines::NoPhoneService,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MultipleLines::No => "No",
            MultipleLines::Yes => "Yes",
            MultipleLines::NoPhoneService => "No phone service",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InternetService {
    #[serde(rename = "DSL")]
    Dsl,
    #[serde(rename = "Fiber optic")]
    FiberOptic,
    No,
}

impl InternetService {
    pub const ALL: [InternetService; 3] = [
        InternetService::Dsl,
        InternetService::FiberOptic,
        InternetService::No,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InternetService::Dsl => "DSL",
            InternetService::FiberOptic => "Fiber optic",
            InternetService::No => "No",
        }
    }
}

/// Value set shared by the six internet add-on services
/// (OnlineSecurity, OnlineBackup, DeviceProtection, TechSupport,
/// StreamingTV, StreamingMovies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InternetAddon {
    No,
    Yes,
    #[serde(rename = "No internet service")]
    NoInternetService,
}

impl InternetAddon {
    pub const ALL: [InternetAddon; 3] = [
        InternetAddon::No,
        InternetAddon::Yes,
        InternetAddon::NoInternetService,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InternetAddon::No => "No",
            InternetAddon::Yes => "Yes",
            InternetAddon::NoInternetService => "No internet service",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contract {
    #[serde(rename = "Month-to-month")]
    MonthToMonth,
    #[serde(rename = "One year")]
    OneYear,
    #[serde(rename = "Two year")]
    TwoYear,
}

impl Contract {
    pub const ALL: [Contract; 3] = [Contract::MonthToMonth, Contract::OneYear, Contract::TwoYear];

    pub fn label(&self) -> &'static str {
        match self {
            Contract::MonthToMonth => "Month-to-month",
            Contract::OneYear => "One year",
            Contract::TwoYear => "Two year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Electronic check")]
    ElectronicCheck,
    #[serde(rename = "Mailed check")]
    MailedCheck,
    #[serde(rename = "Bank transfer (automatic)")]
    BankTransfer,
    #[serde(rename = "Credit card (automatic)")]
    CreditCard,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::ElectronicCheck,
        PaymentMethod::MailedCheck,
        PaymentMethod::BankTransfer,
        PaymentMethod::CreditCard,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::ElectronicCheck => "Electronic check",
            PaymentMethod::MailedCheck => "Mailed check",
            PaymentMethod::BankTransfer => "Bank transfer (automatic)",
            PaymentMethod::CreditCard => "Credit card (automatic)",
        }
    }
}

fn default_tenure() -> u32 {
    TENURE_DEFAULT
}

fn default_monthly_charges() -> f64 {
    MONTHLY_CHARGES_DEFAULT
}

/// Raw input record: 19 named fields, immutable after creation, one per
/// submission. Field names follow the training dataset column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub gender: Gender,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: YesNo,
    #[serde(rename = "Partner")]
    pub partner: YesNo,
    #[serde(rename = "Dependents")]
    pub dependents: YesNo,
    #[serde(default = "default_tenure")]
    pub tenure: u32,
    #[serde(rename = "PhoneService")]
    pub phone_service: YesNo,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: MultipleLines,
    #[serde(rename = "InternetService")]
    pub internet_service: InternetService,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: InternetAddon,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: InternetAddon,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: InternetAddon,
    #[serde(rename = "TechSupport")]
    pub tech_support: InternetAddon,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: InternetAddon,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: InternetAddon,
    #[serde(rename = "Contract")]
    pub contract: Contract,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: YesNo,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "MonthlyCharges", default = "default_monthly_charges")]
    pub monthly_charges: f64,
}

impl CustomerProfile {
    /// Derived field, never entered directly: tenure months times the
    /// monthly charge. Exact, not rounded.
    pub fn total_charges(&self) -> f64 {
        self.tenure as f64 * self.monthly_charges
    }

    /// Clamp the two numeric fields into their declared ranges. The only
    /// input correction allowed; categorical fields are closed enums.
    ///
    /// A non-finite MonthlyCharges is rejected rather than clamped: NaN
    /// survives `f64::clamp` and would poison every downstream value up to
    /// the rendered probability. The form path accepts "NaN" as a float
    /// where JSON cannot, so the check lives here, before any arithmetic.
    pub fn clamped(mut self) -> ChurnResult<Self> {
        if !self.monthly_charges.is_finite() {
            return Err(ChurnError::invalid_input(
                "MonthlyCharges",
                format!("must be a finite number, got {}", self.monthly_charges),
            ));
        }
        self.tenure = self.tenure.min(TENURE_MAX);
        self.monthly_charges = self
            .monthly_charges
            .clamp(MONTHLY_CHARGES_MIN, MONTHLY_CHARGES_MAX);
        Ok(self)
    }

    /// The nine general categorical fields, in the fixed order the general
    /// one-hot encoder was fitted on, as (column, label) pairs.
    pub fn general_categorical(&self) -> [(&'static str, &'static str); 9] {
        [
            ("MultipleLines", self.multiple_lines.label()),
            ("InternetService", self.internet_service.label()),
            ("OnlineSecurity", self.online_security.label()),
            ("OnlineBackup", self.online_backup.label()),
            ("DeviceProtection", self.device_protection.label()),
            ("TechSupport", self.tech_support.label()),
            ("StreamingTV", self.streaming_tv.label()),
            ("StreamingMovies", self.streaming_movies.label()),
            ("Contract", self.contract.label()),
        ]
    }

    /// The single payment-method field for the second, independently
    /// fitted encoder.
    pub fn payment_categorical(&self) -> [(&'static str, &'static str); 1] {
        [("PaymentMethod", self.payment_method.label())]
    }

    /// The binary-mapped and numeric columns retained through the merge
    /// step, in dataset order.
    pub fn retained_columns(&self) -> [(&'static str, f64); 9] {
        [
            ("gender", self.gender.code()),
            ("SeniorCitizen", self.senior_citizen.code()),
            ("Partner", self.partner.code()),
            ("Dependents", self.dependents.code()),
            ("tenure", self.tenure as f64),
            ("PhoneService", self.phone_service.code()),
            ("PaperlessBilling", self.paperless_billing.code()),
            ("MonthlyCharges", self.monthly_charges),
            ("TotalCharges", self.total_charges()),
        ]
    }
}

/// One entry of the form-field catalog: the single source of truth for
/// what the input collector presents.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub prompt: &'static str,
    pub choices: &'static [&'static str],
}

/// Legal values per categorical form field, in display order.
pub fn field_catalog() -> Vec<FieldSpec> {
    fn spec(name: &'static str, prompt: &'static str, choices: &'static [&'static str]) -> FieldSpec {
        FieldSpec {
            name,
            prompt,
            choices,
        }
    }

    const YES_NO: &[&str] = &["Yes", "No"];

    vec![
        spec("gender", "Gender", &["Male", "Female"]),
        spec("SeniorCitizen", "Senior Citizen", YES_NO),
        spec("Partner", "Partner", YES_NO),
        spec("Dependents", "Dependents", YES_NO),
        spec("PhoneService", "Phone Service", YES_NO),
        spec(
            "MultipleLines",
            "Multiple Lines",
            &["No", "Yes", "No phone service"],
        ),
        spec(
            "InternetService",
            "Internet Service",
            &["DSL", "Fiber optic", "No"],
        ),
        spec(
            "OnlineSecurity",
            "Online Security",
            &["No", "Yes", "No internet service"],
        ),
        spec(
            "OnlineBackup",
            "Online Backup",
            &["No", "Yes", "No internet service"],
        ),
        spec(
            "DeviceProtection",
            "Device Protection",
            &["No", "Yes", "No internet service"],
        ),
        spec(
            "TechSupport",
            "Tech Support",
            &["No", "Yes", "No internet service"],
        ),
        spec(
            "StreamingTV",
            "Streaming TV",
            &["No", "Yes", "No internet service"],
        ),
        spec(
            "StreamingMovies",
            "Streaming Movies",
            &["No", "Yes", "No internet service"],
        ),
        spec(
            "Contract",
            "Contract",
            &["Month-to-month", "One year", "Two year"],
        ),
        spec("PaperlessBilling", "Paperless Billing", YES_NO),
        spec(
            "PaymentMethod",
            "Payment Method",
            &[
                "Electronic check",
                "Mailed check",
                "Bank transfer (automatic)",
                "Credit card (automatic)",
            ],
        ),
    ]
}
