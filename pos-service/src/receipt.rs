use chrono::{DateTime, Local};
use common_money::{CartTotals, Money, TaxRate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::CartLine;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "M-Pesa")]
    MPesa,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

impl PaymentMethod {
    /// The methods the synthetic sales report draws from.
    pub const REPORTED: [PaymentMethod; 4] =
        [PaymentMethod::Cash, PaymentMethod::CreditCard, PaymentMethod::MPesa, PaymentMethod::DebitCard];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::MPesa => "M-Pesa",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub transaction_id: String,
    pub business_name: String,
    pub currency: String,
    pub customer_name: String,
    pub cashier: String,
    pub items: Vec<CartLine>,
    pub subtotal: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub date: String,
}

/// `TXN` followed by the sale time to the second.
pub fn transaction_id(at: &DateTime<Local>) -> String {
    at.format("TXN%Y%m%d%H%M%S").to_string()
}

impl Receipt {
    pub fn issue(
        items: Vec<CartLine>,
        customer_name: &str,
        cashier: &str,
        payment_method: PaymentMethod,
        tax_rate: &TaxRate,
        settings: &Settings,
        at: DateTime<Local>,
    ) -> Self {
        let CartTotals { subtotal, tax_rate, tax_amount, total } =
            CartTotals::compute(items.iter().map(|l| &l.line_total), tax_rate);
        Self {
            transaction_id: transaction_id(&at),
            business_name: settings.business_name.clone(),
            currency: settings.currency.clone(),
            customer_name: customer_name.to_string(),
            cashier: cashier.to_string(),
            items,
            subtotal,
            tax_rate,
            tax_amount,
            total,
            payment_method,
            date: at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
