//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Label for a settings field key.
///
/// Usage in templates: `{{ field.key|field_label }}`
#[askama::filter_fn]
pub fn field_label(key: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(label_for(&key.to_string()))
}

fn label_for(key: &str) -> String {
    let label = match key {
        "name" => "Tên cửa hàng",
        "tagline" => "Khẩu hiệu",
        "phone" => "Số điện thoại",
        "email" => "Email",
        "address" => "Địa chỉ",
        "opening_hours" => "Giờ mở cửa",
        "default_fee" => "Phí giao hàng mặc định (₫)",
        "free_shipping_threshold" => "Miễn phí giao hàng từ (₫)",
        "same_day_cutoff" => "Giờ chốt giao trong ngày",
        "express_enabled" => "Bật giao hỏa tốc",
        "express_fee" => "Phí giao hỏa tốc (₫)",
        "cod_enabled" => "Thanh toán khi nhận hàng",
        "bank_transfer_enabled" => "Chuyển khoản ngân hàng",
        "bank_name" => "Ngân hàng",
        "bank_account_number" => "Số tài khoản",
        "bank_account_holder" => "Chủ tài khoản",
        "paypal_enabled" => "PayPal",
        "facebook_url" => "Facebook",
        "instagram_url" => "Instagram",
        "zalo_phone" => "Zalo",
        "facebook_page_id" => "Facebook Page ID",
        "order_email" => "Email nhận đơn hàng",
        "notify_new_order" => "Báo khi có đơn mới",
        "notify_low_stock" => "Báo khi sắp hết hàng",
        "low_stock_threshold" => "Ngưỡng sắp hết hàng",
        "reminder_days_before" => "Nhắc trước (ngày)",
        other => return other.replace('_', " "),
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_for_known_and_unknown_keys() {
        assert_eq!(label_for("zalo_phone"), "Zalo");
        assert_eq!(label_for("gift_wrap_fee"), "gift wrap fee");
    }
}
