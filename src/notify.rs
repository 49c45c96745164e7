use std::time::Duration;

use chrono::FixedOffset;
use serde_json::json;

use crate::{
    config::AppConfig,
    models::{Order, OrderItem},
};

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends order notifications through the Telegram Bot API.
///
/// Both sends are best-effort: every failure is logged and swallowed so the
/// order-creation response never depends on the messaging platform. With
/// `NOTIFICATIONS_ENABLED=false` (the test configuration) both sends
/// short-circuit successfully without touching the network.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    send_message_url: String,
    admin_chat_id: Option<String>,
    enabled: bool,
    tz: FixedOffset,
}

impl Notifier {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        let tz = FixedOffset::east_opt(config.business_utc_offset_hours * 3600)
            .ok_or_else(|| anyhow::anyhow!("invalid BUSINESS_UTC_OFFSET_HOURS"))?;
        Ok(Self {
            client,
            send_message_url: format!(
                "{}/bot{}/sendMessage",
                config.telegram_api_base, config.bot_token
            ),
            admin_chat_id: config.admin_chat_id.clone(),
            enabled: config.notifications_enabled,
            tz,
        })
    }

    /// Fire both order messages. One send failing must not block the other,
    /// so they run concurrently and report independently.
    pub async fn notify_order_created(&self, order: &Order, items: &[OrderItem], district: &str) {
        let (customer_ok, admin_ok) = tokio::join!(
            self.send_customer_confirmation(order, items),
            self.send_admin_alert(order, items, district),
        );
        tracing::info!(
            order_number = order.order_number,
            customer_ok,
            admin_ok,
            "order notifications dispatched"
        );
    }

    pub async fn send_customer_confirmation(&self, order: &Order, items: &[OrderItem]) -> bool {
        if !self.enabled {
            tracing::debug!(
                order_number = order.order_number,
                "notifications disabled, skipping customer confirmation"
            );
            return true;
        }

        let body = json!({
            "chat_id": order.user_id,
            "text": self.customer_message(order, items),
            "parse_mode": "HTML",
        });
        self.send_message(&body, "customer confirmation", order.order_number)
            .await
    }

    pub async fn send_admin_alert(&self, order: &Order, items: &[OrderItem], district: &str) -> bool {
        if !self.enabled {
            tracing::debug!(
                order_number = order.order_number,
                "notifications disabled, skipping admin alert"
            );
            return true;
        }

        let Some(chat_id) = self.admin_chat_id.as_deref() else {
            tracing::warn!("no admin chat id configured, skipping admin alert");
            return false;
        };

        // The buttons round-trip through the bot as callback queries; the
        // bot then calls the admin status endpoint.
        let keyboard = json!({
            "inline_keyboard": [
                [
                    { "text": "✅ Підтвердити", "callback_data": format!("confirm_order:{}", order.order_number) },
                    { "text": "❌ Скасувати", "callback_data": format!("cancel_order:{}", order.order_number) }
                ],
                [
                    { "text": "📞 Зв'язатися", "callback_data": format!("contact_client:{}", order.order_number) }
                ]
            ]
        });

        let body = json!({
            "chat_id": chat_id,
            "text": self.admin_message(order, items, district),
            "parse_mode": "HTML",
            "reply_markup": keyboard,
        });
        self.send_message(&body, "admin alert", order.order_number)
            .await
    }

    async fn send_message(&self, body: &serde_json::Value, kind: &str, order_number: i32) -> bool {
        match self
            .client
            .post(&self.send_message_url)
            .json(body)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(
                    order_number,
                    status = %response.status(),
                    "{kind} rejected by Telegram API"
                );
                false
            }
            Err(err) => {
                tracing::warn!(order_number, error = %err, "failed to send {kind}");
                false
            }
        }
    }

    fn customer_message(&self, order: &Order, items: &[OrderItem]) -> String {
        let mut message = format!(
            "🎉 <b>Замовлення #{} прийнято!</b>\n\n\
             Ваше замовлення успішно оформлено. Менеджер зв'яжеться з вами \
             найближчим часом для уточнення часу доставки.\n\n\
             📋 <b>Деталі замовлення:</b>",
            order.order_number
        );

        let mut total_items = 0;
        for item in items {
            message.push_str(&format!(
                "\n• {} ({} {}) x{}",
                item.product_name, item.weight, item.unit, item.quantity
            ));
            total_items += item.quantity;
        }

        message.push_str(&format!(
            "\n\n📦 <b>Кількість товарів:</b> {} шт.\n💰 <b>Загальна сума:</b> {} грн",
            total_items, order.total_amount
        ));

        if let Some(code) = order.promo_code_used.as_deref() {
            message.push_str(&format!(
                "\n🎫 <b>Промокод:</b> {} (знижка {} грн)",
                code, order.discount_amount
            ));
        }

        message.push_str(&format!(
            "\n\n📅 <i>Замовлення від {}</i>",
            order
                .created_at
                .with_timezone(&self.tz)
                .format("%d.%m.%Y %H:%M")
        ));

        message
    }

    fn admin_message(&self, order: &Order, items: &[OrderItem], district: &str) -> String {
        let mut items_text = String::new();
        let mut total_items = 0;
        for item in items {
            items_text.push_str(&format!(
                "• <b>{}</b> ({} {}) x{} = {} грн\n",
                item.product_name, item.weight, item.unit, item.quantity, item.total_price
            ));
            total_items += item.quantity;
        }

        let mut message = format!(
            "🆕 <b>НОВЕ ЗАМОВЛЕННЯ #{}</b>\n\n\
             <a href='tg://user?id={}'>👤 {}</a> (ID: {})\n\
             📞 <b>Телефон:</b> {}\n\
             📦 <b>Товарів:</b> {} шт.\n\n\
             <b>📋 Список товарів:</b>\n{}\
             📍 <b>Район:</b> {}\n\
             📅 <b>Дата доставки:</b> {}\n\
             ⏰ <b>Час:</b> {}\n",
            order.order_number,
            order.user_id,
            order.contact_name,
            order.user_id,
            order.contact_phone.as_deref().unwrap_or("Не вказано"),
            total_items,
            items_text,
            district,
            order
                .delivery_date
                .with_timezone(&self.tz)
                .format("%d.%m.%Y"),
            order.delivery_time_slot.label(),
        );

        if let Some(comment) = order.comment.as_deref() {
            message.push_str(&format!("💬 <b>Коментар:</b> {comment}\n"));
        }
        if let Some(code) = order.promo_code_used.as_deref() {
            message.push_str(&format!(
                "🎫 <b>Промокод:</b> {} (-{} грн)\n",
                code, order.discount_amount
            ));
        }

        message.push_str(&format!(
            "\n💰 <b>Сума:</b> {} грн\n\n📅 <i>Створено: {}</i>",
            order.total_amount,
            order
                .created_at
                .with_timezone(&self.tz)
                .format("%d.%m.%Y %H:%M")
        ));

        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, TimeSlot};
    use chrono::{TimeZone, Utc};

    fn test_notifier() -> Notifier {
        Notifier {
            client: reqwest::Client::new(),
            send_message_url: "http://localhost/botTEST/sendMessage".into(),
            admin_chat_id: Some("-100123".into()),
            enabled: false,
            tz: FixedOffset::east_opt(2 * 3600).unwrap(),
        }
    }

    fn sample_order() -> Order {
        Order {
            id: 1,
            order_number: 105,
            user_id: 42,
            status: OrderStatus::Pending,
            total_amount: 450.0,
            promo_code_used: Some("SEA10".into()),
            discount_amount: 50.0,
            district_id: 1,
            delivery_time_slot: TimeSlot::Morning,
            delivery_date: Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
            delivery_address: None,
            comment: Some("подзвонити заздалегідь".into()),
            contact_name: "Оксана".into(),
            contact_phone: Some("+380501234567".into()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap(),
            updated_at: None,
        }
    }

    fn sample_items() -> Vec<OrderItem> {
        vec![OrderItem {
            id: 1,
            order_id: 1,
            product_id: "salmon_smoked_001".into(),
            product_name: "Лосось".into(),
            package_code: "1kg".into(),
            weight: 1.0,
            unit: "кг".into(),
            quantity: 2,
            price_per_unit: 250.0,
            total_price: 500.0,
        }]
    }

    #[test]
    fn customer_message_lists_items_and_promo() {
        let notifier = test_notifier();
        let message = notifier.customer_message(&sample_order(), &sample_items());

        assert!(message.contains("Замовлення #105"));
        assert!(message.contains("• Лосось (1 кг) x2"));
        assert!(message.contains("Кількість товарів:</b> 2 шт."));
        assert!(message.contains("450 грн"));
        assert!(message.contains("SEA10"));
    }

    #[test]
    fn admin_message_carries_contact_and_delivery_details() {
        let notifier = test_notifier();
        let message = notifier.admin_message(&sample_order(), &sample_items(), "Центр");

        assert!(message.contains("НОВЕ ЗАМОВЛЕННЯ #105"));
        assert!(message.contains("tg://user?id=42"));
        assert!(message.contains("+380501234567"));
        assert!(message.contains("Район:</b> Центр"));
        assert!(message.contains("02.03.2024"));
        assert!(message.contains(TimeSlot::Morning.label()));
        assert!(message.contains("подзвонити заздалегідь"));
    }

    #[tokio::test]
    async fn disabled_notifier_short_circuits_without_network() {
        let notifier = test_notifier();
        let order = sample_order();
        let items = sample_items();

        assert!(notifier.send_customer_confirmation(&order, &items).await);
        assert!(notifier.send_admin_alert(&order, &items, "Центр").await);
    }
}
