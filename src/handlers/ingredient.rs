use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use tracing::info;

use crate::{
    entities::{cocktail_ingredient, ingredient},
    error::{HandlerError, HandlerResult},
    models::{IngredientInput, IngredientView},
};

pub async fn create(db: &DatabaseConnection, input: &IngredientInput) -> HandlerResult<IngredientView> {
    if input.name.trim().is_empty() {
        return Err(HandlerError::Validation("ingredient name is required".to_string()));
    }

    let existing = ingredient::Entity::find()
        .filter(ingredient::Column::Name.eq(input.name.trim()))
        .count(db)
        .await?;
    if existing > 0 {
        return Err(HandlerError::Conflict(format!(
            "ingredient {:?} already exists",
            input.name.trim()
        )));
    }

    let inserted = ingredient::Entity::insert(ingredient::ActiveModel {
        id: Default::default(),
        name: Set(input.name.trim().to_string()),
        is_available: Set(input.is_available),
        image: Set(input.image.clone()),
    })
    .exec(db)
    .await?;

    info!(ingredient = inserted.last_insert_id, name = %input.name, "created ingredient");
    get(db, inserted.last_insert_id).await
}

pub async fn get(db: &DatabaseConnection, ingredient_id: i32) -> HandlerResult<IngredientView> {
    let model = ingredient::Entity::find_by_id(ingredient_id)
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("ingredient {ingredient_id}")))?;
    Ok(view(model))
}

pub async fn get_all(db: &DatabaseConnection) -> HandlerResult<Vec<IngredientView>> {
    let models =
        ingredient::Entity::find().order_by_asc(ingredient::Column::Name).all(db).await?;
    Ok(models.into_iter().map(view).collect())
}

pub async fn update(
    db: &DatabaseConnection,
    ingredient_id: i32,
    input: &IngredientInput,
) -> HandlerResult<IngredientView> {
    let model = ingredient::Entity::find_by_id(ingredient_id)
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("ingredient {ingredient_id}")))?;

    let mut active: ingredient::ActiveModel = model.into();
    if !input.name.trim().is_empty() {
        active.name = Set(input.name.trim().to_string());
    }
    active.is_available = Set(input.is_available);
    if input.image.is_some() {
        active.image = Set(input.image.clone());
    }
    let updated = ingredient::Entity::update(active).exec(db).await?;

    Ok(view(updated))
}

/// An ingredient still used by a cocktail cannot be removed; the cocktails
/// referencing it must go first.
pub async fn delete(db: &DatabaseConnection, ingredient_id: i32) -> HandlerResult<i32> {
    let references = cocktail_ingredient::Entity::find()
        .filter(cocktail_ingredient::Column::IngredientId.eq(ingredient_id))
        .count(db)
        .await?;
    if references > 0 {
        return Err(HandlerError::Conflict(format!(
            "ingredient {ingredient_id} is used by {references} cocktail(s)"
        )));
    }

    let result = ingredient::Entity::delete_by_id(ingredient_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(HandlerError::NotFound(format!("ingredient {ingredient_id}")));
    }

    info!(ingredient = ingredient_id, "deleted ingredient");
    Ok(ingredient_id)
}

pub async fn availability(db: &DatabaseConnection, ingredient_id: i32) -> HandlerResult<bool> {
    Ok(get(db, ingredient_id).await?.is_available)
}

pub(crate) fn view(i: ingredient::Model) -> IngredientView {
    IngredientView { id: i.id, name: i.name, is_available: i.is_available, image: i.image }
}
