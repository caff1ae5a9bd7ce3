use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::info;

use crate::{
    entities::{cocktail, cocktail_ingredient, ingredient},
    error::{HandlerError, HandlerResult},
    handlers,
    models::{
        CocktailIngredientInput, CocktailIngredientView, CocktailInput, CocktailView,
        MEASUREMENT_UNITS,
    },
};

pub async fn create(db: &DatabaseConnection, input: &CocktailInput) -> HandlerResult<CocktailView> {
    validate(input)?;

    let txn = db.begin().await?;

    let inserted = cocktail::Entity::insert(cocktail::ActiveModel {
        id: Default::default(),
        name: Set(input.name.trim().to_string()),
        instructions: Set(input.instructions.clone()),
        image: Set(input.image.clone()),
    })
    .exec(&txn)
    .await?;

    link_ingredients(&txn, inserted.last_insert_id, &input.ingredients).await?;

    txn.commit().await?;

    info!(cocktail = inserted.last_insert_id, name = %input.name, "created cocktail");
    get(db, inserted.last_insert_id).await
}

pub async fn get(db: &DatabaseConnection, cocktail_id: i32) -> HandlerResult<CocktailView> {
    let model = cocktail::Entity::find_by_id(cocktail_id)
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("cocktail {cocktail_id}")))?;
    view(db, model).await
}

pub async fn get_all(db: &DatabaseConnection) -> HandlerResult<Vec<CocktailView>> {
    let models = cocktail::Entity::find().order_by_asc(cocktail::Column::Name).all(db).await?;

    let mut out = Vec::with_capacity(models.len());
    for model in models {
        out.push(view(db, model).await?);
    }
    Ok(out)
}

pub async fn update(
    db: &DatabaseConnection,
    cocktail_id: i32,
    input: &CocktailInput,
) -> HandlerResult<CocktailView> {
    validate(input)?;

    let model = cocktail::Entity::find_by_id(cocktail_id)
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("cocktail {cocktail_id}")))?;

    let txn = db.begin().await?;

    let mut active: cocktail::ActiveModel = model.into();
    active.name = Set(input.name.trim().to_string());
    active.instructions = Set(input.instructions.clone());
    if input.image.is_some() {
        active.image = Set(input.image.clone());
    }
    cocktail::Entity::update(active).exec(&txn).await?;

    cocktail_ingredient::Entity::delete_many()
        .filter(cocktail_ingredient::Column::CocktailId.eq(cocktail_id))
        .exec(&txn)
        .await?;
    link_ingredients(&txn, cocktail_id, &input.ingredients).await?;

    txn.commit().await?;
    get(db, cocktail_id).await
}

pub async fn delete(db: &DatabaseConnection, cocktail_id: i32) -> HandlerResult<i32> {
    let result = cocktail::Entity::delete_by_id(cocktail_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(HandlerError::NotFound(format!("cocktail {cocktail_id}")));
    }
    info!(cocktail = cocktail_id, "deleted cocktail");
    Ok(cocktail_id)
}

pub async fn availability(db: &DatabaseConnection, cocktail_id: i32) -> HandlerResult<bool> {
    Ok(get(db, cocktail_id).await?.is_available)
}

pub async fn ingredients(
    db: &DatabaseConnection,
    cocktail_id: i32,
) -> HandlerResult<Vec<CocktailIngredientView>> {
    Ok(get(db, cocktail_id).await?.ingredients)
}

fn validate(input: &CocktailInput) -> HandlerResult<()> {
    if input.name.trim().is_empty() {
        return Err(HandlerError::Validation("cocktail name is required".to_string()));
    }
    for item in &input.ingredients {
        if item.amount <= 0 {
            return Err(HandlerError::Validation("ingredient amount must be positive".to_string()));
        }
        if !MEASUREMENT_UNITS.contains(&item.unit.as_str()) {
            return Err(HandlerError::Validation(format!("unknown measurement unit {:?}", item.unit)));
        }
    }
    Ok(())
}

async fn link_ingredients<C: sea_orm::ConnectionTrait>(
    conn: &C,
    cocktail_id: i32,
    items: &[CocktailIngredientInput],
) -> HandlerResult<()> {
    for item in items {
        ingredient::Entity::find_by_id(item.ingredient)
            .one(conn)
            .await?
            .ok_or_else(|| HandlerError::NotFound(format!("ingredient {}", item.ingredient)))?;

        cocktail_ingredient::Entity::insert(cocktail_ingredient::ActiveModel {
            id: Default::default(),
            cocktail_id: Set(cocktail_id),
            ingredient_id: Set(item.ingredient),
            amount: Set(item.amount),
            unit: Set(item.unit.clone()),
        })
        .exec(conn)
        .await?;
    }
    Ok(())
}

async fn view(db: &DatabaseConnection, model: cocktail::Model) -> HandlerResult<CocktailView> {
    let links = cocktail_ingredient::Entity::find()
        .filter(cocktail_ingredient::Column::CocktailId.eq(model.id))
        .find_also_related(ingredient::Entity)
        .all(db)
        .await?;

    let mut items = Vec::with_capacity(links.len());
    for (link, ing) in links {
        let ing = ing.ok_or_else(|| {
            HandlerError::NotFound(format!("ingredient {} for cocktail {}", link.ingredient_id, model.id))
        })?;
        items.push(CocktailIngredientView {
            ingredient: handlers::ingredient::view(ing),
            amount: link.amount,
            unit: link.unit,
        });
    }

    // Derived, never stored: drinkable only when every ingredient is in
    // stock, and a cocktail with no ingredients is not drinkable.
    let is_available = !items.is_empty() && items.iter().all(|i| i.ingredient.is_available);

    Ok(CocktailView {
        id: model.id,
        name: model.name,
        instructions: model.instructions,
        image: model.image,
        is_available,
        ingredients: items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(units: &[(&str, i32)]) -> CocktailInput {
        CocktailInput {
            name: "Негрони".to_string(),
            instructions: "Смешать со льдом".to_string(),
            image: None,
            ingredients: units
                .iter()
                .enumerate()
                .map(|(i, (unit, amount))| CocktailIngredientInput {
                    ingredient: i as i32 + 1,
                    amount: *amount,
                    unit: (*unit).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn validate_accepts_known_units() {
        assert!(validate(&input(&[("ml", 30), ("pcs", 1)])).is_ok());
    }

    #[test]
    fn validate_rejects_unknown_unit() {
        let err = validate(&input(&[("barrel", 1)])).unwrap_err();
        assert!(matches!(err, HandlerError::Validation(_)));
    }

    #[test]
    fn validate_rejects_non_positive_amount() {
        let err = validate(&input(&[("ml", 0)])).unwrap_err();
        assert!(matches!(err, HandlerError::Validation(_)));
    }
}
