use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use crate::{
    db::OrmConn,
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::AppResult,
    state::AppState,
    telegram::TelegramUser,
};

/// Get-or-create the user row for an authenticated Mini-App request,
/// refreshing any profile fields that drifted since the last visit.
pub async fn sync_from_telegram(orm: &OrmConn, tg: &TelegramUser) -> AppResult<UserModel> {
    let existing = Users::find_by_id(tg.id).one(orm).await?;

    let Some(user) = existing else {
        let created = UserActive {
            id: Set(tg.id),
            first_name: Set(tg.first_name.clone()),
            last_name: Set(tg.last_name.clone()),
            username: Set(tg.username.clone()),
            language_code: Set(tg.language_code.clone().unwrap_or_else(|| "uk".into())),
            phone: Set(None),
            is_gold_client: Set(false),
            is_blocked: Set(false),
            bot_interactions_count: Set(0),
            first_bot_interaction: Set(None),
            last_bot_interaction: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(orm)
        .await?;
        return Ok(created);
    };

    let language_code = tg.language_code.clone().unwrap_or_else(|| "uk".into());
    let drifted = user.first_name != tg.first_name
        || user.last_name != tg.last_name
        || user.username != tg.username
        || user.language_code != language_code;

    if !drifted {
        return Ok(user);
    }

    let mut active: UserActive = user.into();
    active.first_name = Set(tg.first_name.clone());
    active.last_name = Set(tg.last_name.clone());
    active.username = Set(tg.username.clone());
    active.language_code = Set(language_code);
    active.updated_at = Set(Some(Utc::now().into()));
    Ok(active.update(orm).await?)
}

/// Record one bot interaction: sync the profile and bump the counters.
/// Returns the refreshed user row.
pub async fn record_interaction(state: &AppState, tg: &TelegramUser) -> AppResult<UserModel> {
    let user = sync_from_telegram(&state.orm, tg).await?;
    let now = Utc::now();

    let count = user.bot_interactions_count;
    let first_seen = user.first_bot_interaction;
    let mut active: UserActive = user.into();
    active.bot_interactions_count = Set(count + 1);
    active.last_bot_interaction = Set(Some(now.into()));
    if first_seen.is_none() {
        active.first_bot_interaction = Set(Some(now.into()));
    }
    Ok(active.update(&state.orm).await?)
}

pub struct BotStats {
    pub total_users: i64,
    pub bot_users: i64,
    pub total_bot_interactions: i64,
    pub active_users_last_7_days: i64,
}

pub async fn bot_stats(state: &AppState) -> AppResult<BotStats> {
    let total_users = Users::find().count(&state.orm).await? as i64;
    let bot_users = Users::find()
        .filter(UserCol::BotInteractionsCount.gt(0))
        .count(&state.orm)
        .await? as i64;

    let total_bot_interactions: (Option<i64>,) =
        sqlx::query_as("SELECT SUM(bot_interactions_count)::BIGINT FROM users")
            .fetch_one(&state.pool)
            .await?;

    let week_ago = Utc::now() - chrono::Duration::days(7);
    let active_users_last_7_days = Users::find()
        .filter(UserCol::LastBotInteraction.gte(week_ago))
        .count(&state.orm)
        .await? as i64;

    Ok(BotStats {
        total_users,
        bot_users,
        total_bot_interactions: total_bot_interactions.0.unwrap_or(0),
        active_users_last_7_days,
    })
}
