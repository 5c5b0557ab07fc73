//! Diner cart
//!
//! Lines stay in the order dishes were first added.

use shared::models::{NewOrder, NewOrderLine};
use validator::Validate;

use crate::session::SeatLink;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    table_id: i64,
    seat_id: Option<i64>,
    lines: Vec<(i64, u32)>,
    note: Option<String>,
}

impl Cart {
    pub fn new(table_id: i64) -> Self {
        Self {
            table_id,
            ..Default::default()
        }
    }

    /// Cart for the seat a diner scanned
    pub fn for_seat(link: &SeatLink) -> Self {
        Self {
            table_id: link.table_id,
            seat_id: link.seat_id,
            ..Default::default()
        }
    }

    pub fn table_id(&self) -> i64 {
        self.table_id
    }

    pub fn seat_id(&self) -> Option<i64> {
        self.seat_id
    }

    pub fn lines(&self) -> &[(i64, u32)] {
        &self.lines
    }

    pub fn quantity(&self, dish_id: i64) -> u32 {
        self.lines
            .iter()
            .find(|(id, _)| *id == dish_id)
            .map_or(0, |(_, qty)| *qty)
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        let note = note.into();
        self.note = if note.trim().is_empty() {
            None
        } else {
            Some(note)
        };
    }

    /// Add `quantity` units of a dish
    pub fn add(&mut self, dish_id: i64, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.lines.iter_mut().find(|(id, _)| *id == dish_id) {
            Some((_, qty)) => *qty = qty.saturating_add(quantity),
            None => self.lines.push((dish_id, quantity)),
        }
    }

    /// Set the exact quantity; 0 removes the line
    pub fn set_quantity(&mut self, dish_id: i64, quantity: u32) {
        if quantity == 0 {
            self.remove(dish_id);
            return;
        }
        match self.lines.iter_mut().find(|(id, _)| *id == dish_id) {
            Some((_, qty)) => *qty = quantity,
            None => self.lines.push((dish_id, quantity)),
        }
    }

    pub fn remove(&mut self, dish_id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|(id, _)| *id != dish_id);
        before != self.lines.len()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.note = None;
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|(_, qty)| *qty).sum()
    }

    /// Build the order payload, validated
    pub fn to_new_order(&self) -> ClientResult<NewOrder> {
        let order = NewOrder {
            table_id: self.table_id,
            seat_id: self.seat_id,
            lines: self
                .lines
                .iter()
                .map(|&(dish_id, quantity)| NewOrderLine { dish_id, quantity })
                .collect(),
            note: self.note.clone(),
        };
        order.validate().map_err(ClientError::from)?;
        Ok(order)
    }

    /// Consume the cart into a validated order payload
    pub fn into_new_order(self) -> ClientResult<NewOrder> {
        self.to_new_order()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merges_and_keeps_order() {
        let mut cart = Cart::new(4);
        cart.add(10, 1);
        cart.add(11, 2);
        cart.add(10, 2);
        cart.add(12, 0);
        assert_eq!(cart.lines(), &[(10, 3), (11, 2)]);
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new(4);
        cart.add(10, 1);
        cart.set_quantity(10, 0);
        assert!(cart.is_empty());
        cart.set_quantity(11, 4);
        assert_eq!(cart.quantity(11), 4);
    }

    #[test]
    fn test_into_new_order() {
        let link = SeatLink::parse("https://comanda.app/m?restaurante=1&mesa=4&silla=2").unwrap();
        let mut cart = Cart::for_seat(&link);
        cart.add(10, 2);
        cart.set_note("sin cebolla");
        let order = cart.into_new_order().unwrap();
        assert_eq!(order.table_id, 4);
        assert_eq!(order.seat_id, Some(2));
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.note.as_deref(), Some("sin cebolla"));
    }

    #[test]
    fn test_empty_cart_is_invalid() {
        let err = Cart::new(4).into_new_order().unwrap_err();
        assert!(err.is_validation(), "{err}");
    }
}
