//! Repository round-trips against a migrated database.

use chrono::{Duration, TimeZone, Utc};
use sqlx::PgPool;

use shootdesk_core::status::{AssetKind, OrderStatus, PaymentAttemptStatus, PaymentStatus, PropertyStatus};
use shootdesk_db::models::deliverable::CreateDeliverable;
use shootdesk_db::models::message::CreateMessage;
use shootdesk_db::models::order::CreateOrder;
use shootdesk_db::models::payment::CreatePayment;
use shootdesk_db::models::property::{CreateProperty, UpdateProperty};
use shootdesk_db::models::user::{CreateUser, User};
use shootdesk_db::repositories::{
    DeliverableRepo, MessageRepo, OrderRepo, PaymentRepo, PropertyRepo, UserRepo,
};

async fn agent(pool: &PgPool, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Dana Realtor".into(),
            email: email.into(),
            password_hash: "not-a-real-hash".into(),
            role: "agent".into(),
            brokerage: Some("Harbour Homes".into()),
        },
    )
    .await
    .unwrap()
}

fn listing(address: &str) -> CreateProperty {
    CreateProperty {
        address: address.into(),
        status: None,
        beds: Some(3),
        baths: Some(2.0),
        sqft: Some(1600),
        price_cents: Some(55_000_000),
        mls_number: None,
        thumbnail_url: None,
    }
}

fn order_for(property_id: i64, user: &User) -> CreateOrder {
    CreateOrder {
        property_id,
        agent_id: user.id,
        service_names: vec!["HDR Photography".into()],
        shoot_date: None,
        agent_name: user.name.clone(),
        notes: None,
        total_cents: 19_900,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_email_is_rejected(pool: PgPool) {
    agent(&pool, "dana@example.com").await;
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            name: "Other".into(),
            email: "dana@example.com".into(),
            password_hash: "x".into(),
            role: "agent".into(),
            brokerage: None,
        },
    )
    .await
    .unwrap_err();

    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "./migrations")]
async fn properties_are_scoped_to_their_agent(pool: PgPool) {
    let dana = agent(&pool, "dana@example.com").await;
    let sam = agent(&pool, "sam@example.com").await;

    let property = PropertyRepo::create(&pool, dana.id, &listing("1 Bay St")).await.unwrap();
    assert_eq!(property.status, PropertyStatus::Active);

    assert!(PropertyRepo::find_by_id(&pool, property.id, Some(sam.id))
        .await
        .unwrap()
        .is_none());
    assert!(PropertyRepo::find_by_id(&pool, property.id, None)
        .await
        .unwrap()
        .is_some());

    let update = UpdateProperty {
        status: Some(PropertyStatus::Sold),
        ..Default::default()
    };
    assert!(PropertyRepo::update(&pool, property.id, Some(sam.id), &update)
        .await
        .unwrap()
        .is_none());
    let updated = PropertyRepo::update(&pool, property.id, Some(dana.id), &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, PropertyStatus::Sold);
    assert_eq!(updated.beds, Some(3));

    assert!(!PropertyRepo::delete(&pool, property.id, Some(sam.id)).await.unwrap());
    assert!(PropertyRepo::delete(&pool, property.id, Some(dana.id)).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn order_lifecycle_updates(pool: PgPool) {
    let dana = agent(&pool, "dana@example.com").await;
    let property = PropertyRepo::create(&pool, dana.id, &listing("2 Bay St")).await.unwrap();

    let order = OrderRepo::create(&pool, &order_for(property.id, &dana)).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);

    let shoot = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();
    let scheduled = OrderRepo::schedule(&pool, order.id, shoot, Some(OrderStatus::Scheduled))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(scheduled.status, OrderStatus::Scheduled);
    assert_eq!(scheduled.shoot_date, Some(shoot));

    let in_march = OrderRepo::list_shoots_between(
        &pool,
        shoot - Duration::days(9),
        shoot + Duration::days(21),
        Some(dana.id),
    )
    .await
    .unwrap();
    assert_eq!(in_march.len(), 1);

    let paid = OrderRepo::update_payment_status(&pool, order.id, PaymentStatus::Paid)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    // Orders block deletion of their property.
    assert!(PropertyRepo::delete(&pool, property.id, None).await.is_err());
}

#[sqlx::test(migrations = "./migrations")]
async fn deliverables_and_payments_round_trip(pool: PgPool) {
    let dana = agent(&pool, "dana@example.com").await;
    let property = PropertyRepo::create(&pool, dana.id, &listing("3 Bay St")).await.unwrap();
    let order = OrderRepo::create(&pool, &order_for(property.id, &dana)).await.unwrap();

    let asset = DeliverableRepo::create(
        &pool,
        order.id,
        &CreateDeliverable {
            kind: AssetKind::Photo,
            label: "Gallery".into(),
            url: "https://cdn.example.com/gallery".into(),
            service_name: "HDR Photography".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(DeliverableRepo::list_for_order(&pool, order.id).await.unwrap(), vec![asset.clone()]);
    assert_eq!(DeliverableRepo::delete(&pool, asset.id).await.unwrap().map(|d| d.order_id), Some(order.id));

    assert!(!PaymentRepo::has_succeeded(&pool, order.id).await.unwrap());
    PaymentRepo::create(
        &pool,
        &CreatePayment {
            order_id: order.id,
            agent_id: dana.id,
            amount_cents: order.total_cents,
            payment_method_ref: "pm_card_visa".into(),
            intent_id: Some("pi_123".into()),
            status: PaymentAttemptStatus::Succeeded,
            error_message: None,
        },
    )
    .await
    .unwrap();
    assert!(PaymentRepo::has_succeeded(&pool, order.id).await.unwrap());
    assert_eq!(PaymentRepo::list_for_agent(&pool, dana.id).await.unwrap().len(), 1);

    let attempt = PaymentRepo::create(
        &pool,
        &CreatePayment {
            order_id: order.id,
            agent_id: dana.id,
            amount_cents: order.total_cents,
            payment_method_ref: "pm_card_mastercard".into(),
            intent_id: None,
            status: PaymentAttemptStatus::Processing,
            error_message: None,
        },
    )
    .await
    .unwrap();
    let finished = PaymentRepo::finish(
        &pool,
        attempt.id,
        PaymentAttemptStatus::RequiresAction,
        Some("pi_456"),
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(finished.status, PaymentAttemptStatus::RequiresAction);
    assert_eq!(finished.intent_id.as_deref(), Some("pi_456"));
    assert!(PaymentRepo::finish(&pool, -1, PaymentAttemptStatus::Failed, None, Some("gone"))
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn messages_fetch_incrementally(pool: PgPool) {
    let dana = agent(&pool, "dana@example.com").await;
    let mut ids = Vec::new();
    for text in ["Hi", "Is Tuesday ok?", "Thanks"] {
        let m = MessageRepo::create(
            &pool,
            &CreateMessage {
                order_id: None,
                agent_id: dana.id,
                sender_id: dana.id,
                sender_name: dana.name.clone(),
                content: text.into(),
                is_admin: false,
            },
        )
        .await
        .unwrap();
        ids.push(m.id);
    }

    let newer = MessageRepo::list_for_agent(&pool, dana.id, None, Some(ids[0]), 50)
        .await
        .unwrap();
    assert_eq!(newer.iter().map(|m| m.id).collect::<Vec<_>>(), ids[1..].to_vec());

    let inbox = MessageRepo::conversations(&pool).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].last_message, "Thanks");
    assert_eq!(inbox[0].message_count, 3);
}
