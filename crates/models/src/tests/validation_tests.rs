use rust_decimal::Decimal;

use crate::{category, product, user};

#[test]
fn product_name_must_not_be_blank() {
    assert!(product::validate_name("Espresso machine").is_ok());
    assert!(product::validate_name("   ").is_err());
    assert!(product::validate_name(&"x".repeat(300)).is_err());
}

#[test]
fn product_price_must_be_non_negative() {
    assert!(product::validate_price(Decimal::ZERO).is_ok());
    assert!(product::validate_price(Decimal::new(1999, 2)).is_ok());
    assert!(product::validate_price(Decimal::new(-1, 0)).is_err());
}

#[test]
fn category_name_bounds() {
    assert!(category::validate_name("Kitchen").is_ok());
    assert!(category::validate_name("").is_err());
    assert!(category::validate_name(&"c".repeat(200)).is_err());
}

#[test]
fn user_email_shape() {
    assert!(user::validate_email("buyer@example.com").is_ok());
    assert!(user::validate_email("not-an-email").is_err());
}
