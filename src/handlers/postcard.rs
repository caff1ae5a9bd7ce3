use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use tracing::info;

use crate::{
    entities::{postcard, postcard_movie},
    error::{HandlerError, HandlerResult},
    models::{PostcardInput, PostcardView},
};

/// Create a postcard for the next meeting. Every previously active postcard
/// is deactivated first, keeping the single-active convention.
pub async fn create(db: &DatabaseConnection, input: &PostcardInput) -> HandlerResult<PostcardView> {
    if input.meeting_date.trim().is_empty() {
        return Err(HandlerError::Validation("meeting_date is required".to_string()));
    }

    let txn = db.begin().await?;

    postcard::Entity::update_many()
        .col_expr(postcard::Column::IsActive, sea_orm::sea_query::Expr::value(false))
        .filter(postcard::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;

    let inserted = postcard::Entity::insert(postcard::ActiveModel {
        id: Default::default(),
        meeting_date: Set(input.meeting_date.clone()),
        title: Set(input.title.clone()),
        screenshot: Set(input.screenshot.clone()),
        created_at: Set(jiff::Timestamp::now().as_second()),
        is_active: Set(true),
    })
    .exec(&txn)
    .await?;

    for movie_id in &input.movies {
        postcard_movie::Entity::insert(postcard_movie::ActiveModel {
            id: Default::default(),
            postcard_id: Set(inserted.last_insert_id),
            movie_id: Set(*movie_id),
        })
        .exec(&txn)
        .await?;
    }

    txn.commit().await?;

    info!(postcard = inserted.last_insert_id, "created postcard");
    get(db, inserted.last_insert_id).await
}

pub async fn get(db: &DatabaseConnection, postcard_id: i32) -> HandlerResult<PostcardView> {
    let model = postcard::Entity::find_by_id(postcard_id)
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("postcard {postcard_id}")))?;
    view(db, model).await
}

pub async fn get_all(db: &DatabaseConnection) -> HandlerResult<Vec<PostcardView>> {
    let models = postcard::Entity::find()
        .order_by_desc(postcard::Column::MeetingDate)
        .all(db)
        .await?;

    let mut out = Vec::with_capacity(models.len());
    for model in models {
        out.push(view(db, model).await?);
    }
    Ok(out)
}

pub async fn update(
    db: &DatabaseConnection,
    postcard_id: i32,
    input: &PostcardInput,
) -> HandlerResult<PostcardView> {
    let model = postcard::Entity::find_by_id(postcard_id)
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("postcard {postcard_id}")))?;

    let txn = db.begin().await?;

    let mut active: postcard::ActiveModel = model.into();
    active.meeting_date = Set(input.meeting_date.clone());
    active.title = Set(input.title.clone());
    if input.screenshot.is_some() {
        active.screenshot = Set(input.screenshot.clone());
    }
    postcard::Entity::update(active).exec(&txn).await?;

    postcard_movie::Entity::delete_many()
        .filter(postcard_movie::Column::PostcardId.eq(postcard_id))
        .exec(&txn)
        .await?;
    for movie_id in &input.movies {
        postcard_movie::Entity::insert(postcard_movie::ActiveModel {
            id: Default::default(),
            postcard_id: Set(postcard_id),
            movie_id: Set(*movie_id),
        })
        .exec(&txn)
        .await?;
    }

    txn.commit().await?;
    get(db, postcard_id).await
}

pub async fn delete(db: &DatabaseConnection, postcard_id: i32) -> HandlerResult<()> {
    let result = postcard::Entity::delete_by_id(postcard_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(HandlerError::NotFound(format!("postcard {postcard_id}")));
    }
    info!(postcard = postcard_id, "deleted postcard");
    Ok(())
}

/// The one postcard invitations go out for. Zero active postcards means
/// there is nothing to send; more than one means the single-active
/// convention was broken outside this handler.
pub async fn get_active(db: &DatabaseConnection) -> HandlerResult<PostcardView> {
    let mut active = postcard::Entity::find()
        .filter(postcard::Column::IsActive.eq(true))
        .all(db)
        .await?;

    match active.len() {
        0 => Err(HandlerError::NotFound("active postcard".to_string())),
        1 => view(db, active.remove(0)).await,
        n => Err(HandlerError::Conflict(format!("{n} postcards are active at once"))),
    }
}

pub async fn count(db: &DatabaseConnection) -> HandlerResult<u64> {
    Ok(postcard::Entity::find().count(db).await?)
}

async fn view(db: &DatabaseConnection, model: postcard::Model) -> HandlerResult<PostcardView> {
    let movies = postcard_movie::Entity::find()
        .filter(postcard_movie::Column::PostcardId.eq(model.id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.movie_id)
        .collect();

    Ok(PostcardView {
        id: model.id,
        meeting_date: model.meeting_date,
        title: model.title,
        screenshot: model.screenshot,
        created_at: model.created_at,
        is_active: model.is_active,
        movies,
    })
}
