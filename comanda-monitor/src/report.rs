//! Plain-text rendering of the order board

use comanda_client::{Detail, OrderBoard, PendingEntry};
use shared::Order;
use shared::models::Role;

/// One line per order the role cares about: the kitchen queue for cooks,
/// the delivery queue for waiters, both for owners
pub fn board_lines(board: &OrderBoard, role: Role) -> Vec<String> {
    let mut lines = Vec::new();
    if role != Role::Waiter {
        lines.push(format!("Kitchen ({})", board.pending().len()));
        lines.extend(board.pending().iter().map(pending_line));
    }
    if role != Role::Cook {
        lines.push(format!("Ready ({})", board.ready().len()));
        lines.extend(board.ready().iter().map(|o| format!("  {}", order_line(o))));
    }
    lines
}

fn pending_line(entry: &PendingEntry) -> String {
    match &entry.detail {
        Detail::Loading => format!("  #{} loading...", entry.order_id),
        Detail::Failed(reason) => format!("  #{} unavailable: {reason}", entry.order_id),
        Detail::Resolved(order) => format!("  {}", order_line(order)),
    }
}

fn order_line(order: &Order) -> String {
    let dishes = order
        .lines
        .iter()
        .map(|l| format!("{}x {}", l.quantity, l.name))
        .collect::<Vec<_>>()
        .join(", ");
    let mut line = format!(
        "#{} table {} [{}] {}",
        order.id,
        order.table_label(),
        order.state,
        dishes
    );
    if let Some(note) = order.note.as_deref().filter(|n| !n.is_empty()) {
        line.push_str(&format!(" ({note})"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderLine, StateTimestamps};
    use shared::{OrderId, OrderState};

    fn order(id: &str, state: OrderState) -> Order {
        Order {
            id: OrderId::new(id),
            table_id: 12,
            table_number: Some(4),
            lines: vec![OrderLine {
                dish_id: 1,
                name: "Empanada".into(),
                quantity: 2,
            }],
            note: Some("sin pebre".into()),
            state,
            timestamps: StateTimestamps::default(),
        }
    }

    #[test]
    fn test_cook_sees_kitchen_only() {
        let mut board = OrderBoard::new();
        board.on_new_order(OrderId::new("1"));
        board.on_new_order(OrderId::new("2"));
        board.resolve_pending(order("2", OrderState::Confirmed));
        board.insert_ready(order("3", OrderState::Terminated));

        let lines = board_lines(&board, Role::Cook);
        assert_eq!(lines[0], "Kitchen (2)");
        assert_eq!(
            lines[1],
            format!("  #2 table 4 [{}] 2x Empanada (sin pebre)", OrderState::Confirmed)
        );
        assert_eq!(lines[2], "  #1 loading...");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_waiter_sees_ready_only() {
        let mut board = OrderBoard::new();
        board.on_new_order(OrderId::new("1"));
        board.insert_ready(order("3", OrderState::Terminated));
        let lines = board_lines(&board, Role::Waiter);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Ready (1)");
    }
}
