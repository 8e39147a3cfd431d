use common_catalog::Product;
use common_http_errors::ApiError;
use common_money::{CartTotals, Money, TaxRate};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),
    #[error("product {0} does not exist")]
    UnknownProduct(i64),
    #[error("only {available} of {name} in stock, cart would hold {requested}")]
    InsufficientStock { name: String, available: i32, requested: i64 },
    #[error("product {0} is not in the cart")]
    NotInCart(i64),
}

impl CartError {
    /// Short label used for metrics and error codes.
    pub fn reason(&self) -> &'static str {
        match self {
            CartError::InvalidQuantity(_) => "invalid_quantity",
            CartError::UnknownProduct(_) => "unknown_product",
            CartError::InsufficientStock { .. } => "insufficient_stock",
            CartError::NotInCart(_) => "not_in_cart",
        }
    }
}

impl From<CartError> for ApiError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::UnknownProduct(_) | CartError::NotInCart(_) => ApiError::not_found(e.reason()),
            _ => ApiError::bad_request(e.reason(), e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

impl CartLine {
    fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.line_total = self.unit_price.times(quantity);
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Adds `quantity` units, merging into an existing line for the same product.
    /// The merged quantity may not exceed the product's on-hand stock.
    pub fn add(&mut self, product: &Product, quantity: i64) -> Result<&CartLine, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let idx = self.lines.iter().position(|l| l.product_id == product.id);
        let held = idx.map(|i| self.lines[i].quantity).unwrap_or(0);
        let requested = held.saturating_add(quantity);
        if requested > i64::from(product.stock_quantity) {
            return Err(CartError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock_quantity,
                requested,
            });
        }
        let idx = match idx {
            Some(i) => {
                self.lines[i].set_quantity(requested);
                i
            }
            None => {
                self.lines.push(CartLine {
                    product_id: product.id,
                    name: product.name.clone(),
                    unit_price: product.price.clone(),
                    quantity,
                    line_total: product.price.times(quantity),
                });
                self.lines.len() - 1
            }
        };
        Ok(&self.lines[idx])
    }

    pub fn remove(&mut self, product_id: i64) -> Result<CartLine, CartError> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        Ok(self.lines.remove(idx))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn totals(&self, tax_rate: &TaxRate) -> CartTotals {
        CartTotals::compute(self.lines.iter().map(|l| &l.line_total), tax_rate)
    }

    /// Empties the cart and hands back its lines.
    pub fn take(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_catalog::sample_products;

    #[test]
    fn add_merges_lines_and_reprices() {
        let products = sample_products();
        let mut cart = Cart::default();
        cart.add(&products[0], 2).unwrap();
        let line = cart.add(&products[0], 3).unwrap();
        assert_eq!(line.quantity, 5);
        assert_eq!(line.line_total, Money::from_cents(25_000));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn cumulative_quantity_capped_by_stock() {
        let products = sample_products();
        let tea = &products[3];
        let mut cart = Cart::default();
        cart.add(tea, i64::from(tea.stock_quantity)).unwrap();
        let err = cart.add(tea, 1).unwrap_err();
        assert_eq!(err.reason(), "insufficient_stock");
        assert_eq!(cart.lines()[0].quantity, i64::from(tea.stock_quantity));
    }

    #[test]
    fn zero_and_negative_quantities_rejected() {
        let products = sample_products();
        let mut cart = Cart::default();
        assert_eq!(cart.add(&products[0], 0).unwrap_err(), CartError::InvalidQuantity(0));
        assert_eq!(cart.add(&products[0], -2).unwrap_err(), CartError::InvalidQuantity(-2));
        assert!(cart.is_empty());
    }

    #[test]
    fn totals_apply_tax() {
        let products = sample_products();
        let mut cart = Cart::default();
        cart.add(&products[0], 2).unwrap(); // 2 x 50.00
        cart.add(&products[4], 1).unwrap(); // 1 x 300.00
        let totals = cart.totals(&TaxRate::default());
        assert_eq!(totals.subtotal, Money::from_cents(40_000));
        assert_eq!(totals.tax_amount, Money::from_cents(6_400));
        assert_eq!(totals.total, Money::from_cents(46_400));
    }

    #[test]
    fn remove_and_take() {
        let products = sample_products();
        let mut cart = Cart::default();
        cart.add(&products[0], 1).unwrap();
        cart.add(&products[1], 1).unwrap();
        assert_eq!(cart.remove(products[0].id).unwrap().product_id, products[0].id);
        assert_eq!(cart.remove(products[0].id), Err(CartError::NotInCart(products[0].id)));
        assert_eq!(cart.take().len(), 1);
        assert!(cart.is_empty());
    }
}
