use sea_orm::{DatabaseConnection, EntityTrait};

use crate::{
    entities::app_user,
    error::{HandlerError, HandlerResult},
    models::UserView,
};

pub async fn get(db: &DatabaseConnection, user_id: i32) -> HandlerResult<UserView> {
    let model = app_user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("user {user_id}")))?;
    Ok(view(model))
}

pub async fn get_all(db: &DatabaseConnection) -> HandlerResult<Vec<UserView>> {
    let models = app_user::Entity::find().all(db).await?;
    Ok(models.into_iter().map(view).collect())
}

fn view(u: app_user::Model) -> UserView {
    UserView {
        id: u.id,
        username: u.username,
        first_name: u.first_name,
        last_name: u.last_name,
        email: u.email,
        avatar: u.avatar,
    }
}
