//! Batch loaders used to join bookings and payments with the rows they reference.

use std::collections::{HashMap, HashSet};

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::{
        bookings::Model as BookingModel,
        grounds::{self, Entity as Grounds},
        users::{self, Entity as Users},
    },
    error::AppResult,
    models::BookingDetails,
};

pub async fn users_by_id<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> AppResult<HashMap<Uuid, users::Model>> {
    let ids: HashSet<Uuid> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = Users::find()
        .filter(users::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|u| (u.id, u)).collect())
}

pub async fn grounds_by_id<C: ConnectionTrait>(
    conn: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> AppResult<HashMap<Uuid, grounds::Model>> {
    let ids: HashSet<Uuid> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = Grounds::find()
        .filter(grounds::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|g| (g.id, g)).collect())
}

/// Attach user and ground summaries, preserving the input order.
pub async fn hydrate_bookings<C: ConnectionTrait>(
    conn: &C,
    bookings: Vec<BookingModel>,
) -> AppResult<Vec<BookingDetails>> {
    let users = users_by_id(conn, bookings.iter().map(|b| b.user_id)).await?;
    let grounds = grounds_by_id(conn, bookings.iter().map(|b| b.ground_id)).await?;

    Ok(bookings
        .into_iter()
        .map(|b| {
            let user = users.get(&b.user_id);
            let ground = grounds.get(&b.ground_id);
            BookingDetails::from_parts(b, user, ground)
        })
        .collect())
}
