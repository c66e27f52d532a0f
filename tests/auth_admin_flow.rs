mod common;

use turf_booking_api::{
    dto::{
        admin::UpdateRoleRequest,
        auth::{LoginRequest, RegisterRequest},
        bookings::CreateBookingRequest,
        grounds::{CreateGroundRequest, UpdateGroundRequest},
        payments::CreatePaymentRequest,
    },
    entity::users::Role,
    error::AppError,
    middleware::auth::decode_token,
    services::{admin_service, auth_service, booking_service, ground_service, payment_service},
};

fn registration(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        name: "  Asha <b>Rao</b> ".into(),
        email: email.into(),
        phone: "98765-43210".into(),
        password: password.into(),
        confirm_password: password.into(),
    }
}

#[tokio::test]
async fn register_login_and_me() -> anyhow::Result<()> {
    let _guard = common::serial().await;
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let registered = auth_service::register_user(&state, registration(" Asha@Example.com ", "Secret123"))
        .await?
        .data
        .expect("auth response");
    assert_eq!(registered.user.email, "asha@example.com");
    assert_eq!(registered.user.phone, "9876543210");
    assert_eq!(registered.user.role, Role::User);
    assert!(!registered.user.name.contains('<'));
    assert_eq!(
        decode_token(&state.tokens, &registered.token)?,
        registered.user.id
    );

    let duplicate = auth_service::register_user(&state, registration("asha@example.com", "Secret123"))
        .await
        .expect_err("email taken");
    assert!(matches!(duplicate, AppError::Conflict(_)));

    let weak = auth_service::register_user(&state, registration("weak@example.com", "password"))
        .await
        .expect_err("weak password");
    assert!(matches!(weak, AppError::BadRequest(_)));

    let mut mismatch = registration("mismatch@example.com", "Secret123");
    mismatch.confirm_password = "Secret124".into();
    let err = auth_service::register_user(&state, mismatch)
        .await
        .expect_err("passwords differ");
    assert!(matches!(err, AppError::BadRequest(_)));

    let logged_in = auth_service::login_user(
        &state,
        LoginRequest {
            email: "ASHA@example.com".into(),
            password: "Secret123".into(),
        },
    )
    .await?
    .data
    .expect("auth response");
    assert_eq!(logged_in.user.id, registered.user.id);

    let bad = auth_service::login_user(
        &state,
        LoginRequest {
            email: "asha@example.com".into(),
            password: "Secret999".into(),
        },
    )
    .await
    .expect_err("wrong password");
    assert!(matches!(bad, AppError::Unauthorized(_)));

    let unknown = auth_service::login_user(
        &state,
        LoginRequest {
            email: "nobody@example.com".into(),
            password: "Secret123".into(),
        },
    )
    .await
    .expect_err("unknown email");
    assert!(matches!(unknown, AppError::Unauthorized(_)));

    let caller = common::create_user(&state, Role::User, "caller@example.com").await?;
    let me = auth_service::current_user(&state, &caller).await?.data.expect("user");
    assert_eq!(me.id, caller.user_id);
    assert_eq!(me.email, "caller@example.com");

    Ok(())
}

#[tokio::test]
async fn ground_lifecycle_respects_ownership_and_soft_delete() -> anyhow::Result<()> {
    let _guard = common::serial().await;
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let owner = common::create_user(&state, Role::GroundManager, "owner@example.com").await?;
    let other = common::create_user(&state, Role::GroundManager, "other@example.com").await?;
    let admin = common::create_user(&state, Role::Admin, "admin@example.com").await?;
    let player = common::create_user(&state, Role::User, "player@example.com").await?;

    let err = ground_service::create_ground(
        &state,
        &player,
        CreateGroundRequest {
            name: "Backyard".into(),
            location: "Home".into(),
            price_per_slot: Some(100),
            ..Default::default()
        },
    )
    .await
    .expect_err("plain users cannot create grounds");
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = ground_service::create_ground(
        &state,
        &owner,
        CreateGroundRequest {
            name: "Free Pitch".into(),
            location: "Park".into(),
            price_per_slot: Some(0),
            ..Default::default()
        },
    )
    .await
    .expect_err("price must be positive");
    assert!(matches!(err, AppError::BadRequest(_)));

    let ground = ground_service::create_ground(
        &state,
        &owner,
        CreateGroundRequest {
            name: "City Arena".into(),
            location: "Downtown".into(),
            price_per_slot: Some(2000),
            available_slots: vec![" 06:00-07:00 ".into(), "06:00-07:00".into(), "07:00-08:00".into()],
            manager_id: Some(other.user_id),
        },
    )
    .await?
    .data
    .expect("ground");
    assert_eq!(ground.manager_id, owner.user_id);
    assert_eq!(ground.available_slots, vec!["06:00-07:00", "07:00-08:00"]);
    assert!(ground.is_active);

    let assigned = ground_service::create_ground(
        &state,
        &admin,
        CreateGroundRequest {
            name: "Harbour Field".into(),
            location: "Docks".into(),
            price_per_slot: Some(1200),
            available_slots: vec!["20:00-21:00".into()],
            manager_id: Some(other.user_id),
        },
    )
    .await?
    .data
    .expect("ground");
    assert_eq!(assigned.manager_id, other.user_id);

    let err = ground_service::update_ground(
        &state,
        &other,
        ground.id,
        UpdateGroundRequest {
            price_per_slot: Some(1),
            ..Default::default()
        },
    )
    .await
    .expect_err("not the owner");
    assert!(matches!(err, AppError::Forbidden(_)));

    let updated = ground_service::update_ground(
        &state,
        &owner,
        ground.id,
        UpdateGroundRequest {
            price_per_slot: Some(2500),
            location: Some("Uptown".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("ground");
    assert_eq!(updated.price_per_slot, 2500);
    assert_eq!(updated.location, "Uptown");
    assert_eq!(updated.name, "City Arena");

    let mine = ground_service::list_my_grounds(&state, &owner).await?;
    assert_eq!(mine.count, Some(1));

    let listed = ground_service::list_active_grounds(&state).await?;
    assert_eq!(listed.count, Some(2));

    ground_service::deactivate_ground(&state, &owner, ground.id).await?;

    let listed = ground_service::list_active_grounds(&state).await?.data.expect("grounds");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, assigned.id);

    let fetched = ground_service::get_ground(&state, ground.id).await?.data.expect("ground");
    assert!(!fetched.is_active);
    assert_eq!(fetched.manager.as_ref().map(|m| m.id), Some(owner.user_id));

    Ok(())
}

#[tokio::test]
async fn admin_manages_users_and_reads_stats() -> anyhow::Result<()> {
    let _guard = common::serial().await;
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let admin = common::create_user(&state, Role::Admin, "admin@example.com").await?;
    let manager = common::create_user(&state, Role::GroundManager, "gm@example.com").await?;
    let player = common::create_user(&state, Role::User, "player@example.com").await?;
    let idle = common::create_user(&state, Role::User, "idle@example.com").await?;

    let err = admin_service::list_users(&state, &player)
        .await
        .expect_err("admin only");
    assert!(matches!(err, AppError::Forbidden(_)));

    let users = admin_service::list_users(&state, &admin).await?;
    assert_eq!(users.count, Some(4));

    let promoted = admin_service::update_user_role(
        &state,
        &admin,
        idle.user_id,
        UpdateRoleRequest {
            role: "paymentManager".into(),
        },
    )
    .await?
    .data
    .expect("user");
    assert_eq!(promoted.role, Role::PaymentManager);

    let err = admin_service::update_user_role(
        &state,
        &admin,
        idle.user_id,
        UpdateRoleRequest {
            role: "superuser".into(),
        },
    )
    .await
    .expect_err("unknown role");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = admin_service::update_user_role(
        &state,
        &admin,
        admin.user_id,
        UpdateRoleRequest { role: "user".into() },
    )
    .await
    .expect_err("admins cannot demote themselves");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = admin_service::delete_user(&state, &admin, admin.user_id)
        .await
        .expect_err("admins cannot delete themselves");
    assert!(matches!(err, AppError::BadRequest(_)));

    let ground = common::create_ground(&state, &manager, &["09:00-10:00", "10:00-11:00"]).await?;
    let first = booking_service::create_booking(
        &state,
        &player,
        CreateBookingRequest {
            ground_id: Some(ground.id),
            booking_date: "2025-03-01".into(),
            time_slot: "09:00-10:00".into(),
        },
    )
    .await?
    .data
    .expect("booking");
    let second = booking_service::create_booking(
        &state,
        &player,
        CreateBookingRequest {
            ground_id: Some(ground.id),
            booking_date: "2025-03-01".into(),
            time_slot: "10:00-11:00".into(),
        },
    )
    .await?
    .data
    .expect("booking");
    booking_service::approve_booking(&state, &manager, first.id).await?;
    booking_service::reject_booking(&state, &manager, second.id).await?;

    let payment = payment_service::create_payment(
        &state,
        &player,
        CreatePaymentRequest {
            booking_id: Some(first.id),
            payment_method: Some("UPI".into()),
        },
    )
    .await?
    .data
    .expect("payment");
    payment_service::verify_payment(&state, &admin, payment.id).await?;

    let err = admin_service::delete_user(&state, &admin, player.user_id)
        .await
        .expect_err("player still has bookings");
    assert!(matches!(err, AppError::Conflict(_)));

    let stats = admin_service::system_stats(&state, &admin).await?.data.expect("stats");
    assert_eq!(stats.users.total, 4);
    assert_eq!(stats.users.by_role.admin, 1);
    assert_eq!(stats.users.by_role.ground_manager, 1);
    assert_eq!(stats.users.by_role.payment_manager, 1);
    assert_eq!(stats.users.by_role.user, 1);
    assert_eq!(stats.grounds.total, 1);
    assert_eq!(stats.bookings.total, 2);
    assert_eq!(stats.bookings.pending, 0);
    assert_eq!(stats.bookings.approved, 1);
    assert_eq!(stats.bookings.rejected, 1);
    assert_eq!(stats.bookings.paid, 1);
    assert_eq!(stats.bookings.unpaid, 1);
    assert_eq!(stats.payments.total, 1);
    assert_eq!(stats.payments.verified, 1);
    assert_eq!(stats.payments.refunded, 0);

    admin_service::delete_user(&state, &admin, idle.user_id).await?;
    let users = admin_service::list_users(&state, &admin).await?;
    assert_eq!(users.count, Some(3));

    let err = admin_service::delete_user(&state, &admin, idle.user_id)
        .await
        .expect_err("already gone");
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn deleting_a_user_while_they_book_never_fails_with_a_server_error() -> anyhow::Result<()> {
    let _guard = common::serial().await;
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let admin = common::create_user(&state, Role::Admin, "admin@example.com").await?;
    let manager = common::create_user(&state, Role::GroundManager, "gm@example.com").await?;
    let ground = common::create_ground(&state, &manager, &["09:00-10:00"]).await?;

    for round in 0..10 {
        let player =
            common::create_user(&state, Role::User, &format!("racer{round}@example.com")).await?;

        let booking = {
            let state = state.clone();
            let player = player.clone();
            let ground_id = ground.id;
            tokio::spawn(async move {
                booking_service::create_booking(
                    &state,
                    &player,
                    CreateBookingRequest {
                        ground_id: Some(ground_id),
                        booking_date: format!("2025-05-{:02}", round + 1),
                        time_slot: "09:00-10:00".into(),
                    },
                )
                .await
            })
        };
        let delete = {
            let state = state.clone();
            let admin = admin.clone();
            let player_id = player.user_id;
            tokio::spawn(async move { admin_service::delete_user(&state, &admin, player_id).await })
        };

        let booked = booking.await?.is_ok();
        match delete.await? {
            Ok(_) => assert!(!booked, "user deleted although the booking was stored"),
            Err(AppError::Conflict(_)) => assert!(booked),
            Err(other) => panic!("unexpected delete error: {other:?}"),
        }
    }

    Ok(())
}
