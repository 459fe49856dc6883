use crate::entity::receipts::PaymentType;
use crate::models::{Receipt, ReceiptItem};

const WIDTH: usize = 32;
const AMOUNT_COLS: usize = 12;

/// Render a stored receipt as a fixed-width plain-text document. Purely a
/// pretty-printer: totals and change were computed at creation time.
///
/// Product names longer than the name column are truncated; an empty shop
/// name renders as a blank header line.
pub fn render(receipt: &Receipt, items: &[ReceiptItem]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(center(&receipt.shop_name));
    lines.push("=".repeat(WIDTH));

    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            lines.push("-".repeat(WIDTH));
        }
        lines.push(format!("{:.2} x {:.2}", item.quantity, item.price));
        lines.push(format!(
            "{:<name_cols$}{:>AMOUNT_COLS$.2}",
            truncate(&item.name, WIDTH - AMOUNT_COLS),
            item.line_total,
            name_cols = WIDTH - AMOUNT_COLS,
        ));
    }

    lines.push("=".repeat(WIDTH));
    lines.push(format!("TOTAL{:>cols$.2}", receipt.total, cols = WIDTH - 5));
    lines.push(format!(
        "{:<10}{:>cols$.2}",
        receipt.payment_type.as_str(),
        receipt.amount,
        cols = WIDTH - 10,
    ));
    if receipt.payment_type == PaymentType::Cash {
        lines.push(format!("CHANGE{:>cols$.2}", receipt.change, cols = WIDTH - 6));
    }
    lines.push("=".repeat(WIDTH));
    lines.push(center(&receipt.created_at.format("%d.%m.%Y %H:%M").to_string()));
    lines.push(center("Thank you for your purchase!"));

    lines.join("\n")
}

fn center(text: &str) -> String {
    format!("{text:^WIDTH$}")
}

fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::receipt_items::QuantityUnit;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn receipt(payment_type: PaymentType, amount: &str, total: &str, change: &str) -> Receipt {
        Receipt {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            shop_name: "Corner Shop".to_string(),
            payment_type,
            amount: d(amount),
            total: d(total),
            change: d(change),
            created_at: Utc.with_ymd_and_hms(2024, 3, 14, 9, 26, 0).unwrap(),
        }
    }

    fn item(receipt_id: Uuid, name: &str, price: &str, quantity: &str) -> ReceiptItem {
        ReceiptItem {
            id: Uuid::new_v4(),
            receipt_id,
            name: name.to_string(),
            price: d(price),
            quantity: d(quantity),
            quantity_unit: QuantityUnit::Pcs,
            line_total: crate::calculator::line_total(d(price), d(quantity)),
        }
    }

    #[test]
    fn cash_receipt_layout() {
        let receipt = receipt(PaymentType::Cash, "100.00", "99.99", "0.01");
        let items = vec![
            item(receipt.id, "Bread", "16.66", "3"),
            item(receipt.id, "Milk", "50.01", "1"),
        ];

        let text = render(&receipt, &items);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], format!("{:^32}", "Corner Shop"));
        assert_eq!(lines[1], "=".repeat(32));
        assert_eq!(lines[2], "3.00 x 16.66");
        assert_eq!(lines[3], format!("{:<20}{:>12}", "Bread", "49.98"));
        assert_eq!(lines[4], "-".repeat(32));
        assert_eq!(lines[7], "=".repeat(32));
        assert_eq!(lines[8], format!("TOTAL{:>27}", "99.99"));
        assert_eq!(lines[9], format!("{:<10}{:>22}", "cash", "100.00"));
        assert_eq!(lines[10], format!("CHANGE{:>26}", "0.01"));
        assert_eq!(lines[12], format!("{:^32}", "14.03.2024 09:26"));
        assert!(lines.iter().all(|l| l.chars().count() <= 32));
    }

    #[test]
    fn cashless_receipt_has_no_change_line() {
        let receipt = receipt(PaymentType::Cashless, "9.00", "9.00", "0.00");
        let items = vec![item(receipt.id, "Coffee", "4.50", "2")];

        let text = render(&receipt, &items);
        assert!(!text.contains("CHANGE"));
        assert!(text.contains("cashless"));
    }

    #[test]
    fn long_product_names_are_truncated() {
        let receipt = receipt(PaymentType::Cash, "10.00", "10.00", "0.00");
        let items = vec![item(
            receipt.id,
            "An unreasonably verbose product name",
            "10.00",
            "1",
        )];

        let text = render(&receipt, &items);
        let name_line = text
            .lines()
            .find(|l| l.starts_with("An unreasonably"))
            .unwrap();
        assert_eq!(name_line.chars().count(), 32);
        assert!(name_line.ends_with("10.00"));
    }

    #[test]
    fn empty_shop_name_renders_blank_header() {
        let mut r = receipt(PaymentType::Cash, "10.00", "10.00", "0.00");
        r.shop_name = String::new();
        let items = vec![item(r.id, "Soap", "10.00", "1")];

        let text = render(&r, &items);
        assert_eq!(text.lines().next().unwrap(), " ".repeat(32));
    }
}
