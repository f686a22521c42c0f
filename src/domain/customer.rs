//! Customer identity models and required-field validation

use serde::{Deserialize, Serialize};

/// Required customer fields the gateway insists on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CustomerField {
    Name,
    Cpf,
}

impl std::fmt::Display for CustomerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerField::Name => write!(f, "name"),
            CustomerField::Cpf => write!(f, "cpf"),
        }
    }
}

/// Customer identity submitted with a charge
///
/// Name and CPF are mandatory before any charge can be requested; email and
/// phone are optional and replaced by gateway placeholders when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: String,
    pub cpf: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerInfo {
    /// Report which required fields are missing (empty or whitespace-only)
    pub fn missing_fields(&self) -> Vec<CustomerField> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push(CustomerField::Name);
        }
        if self.cpf.trim().is_empty() {
            missing.push(CustomerField::Cpf);
        }
        missing
    }

    /// True when all required fields are present
    pub fn has_required_fields(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Overlay data collected from the user onto this record
    ///
    /// Non-empty collected values win; anything the form left blank keeps the
    /// value already held.
    pub fn merge(mut self, collected: CustomerInfo) -> Self {
        if !collected.name.trim().is_empty() {
            self.name = collected.name;
        }
        if !collected.cpf.trim().is_empty() {
            self.cpf = collected.cpf;
        }
        if collected.email.is_some() {
            self.email = collected.email;
        }
        if collected.phone.is_some() {
            self.phone = collected.phone;
        }
        self
    }
}
