use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub kp_id: i32,
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub slogan: String,
    /// JSON-encoded list of country names, as delivered by the metadata feed.
    pub countries: String,
    pub budget: i64,
    pub fees: i64,
    pub premiere: String,
    pub duration: i32,
    pub poster: String,
    /// Kept as raw text; legacy rows and the external feed may use a comma
    /// decimal separator. Normalized at the statistics boundary.
    pub rating_kp: String,
    pub rating_imdb: String,
    pub votes_kp: i32,
    pub votes_imdb: i32,
    pub watch_date: Option<String>,
    pub is_archive: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::note::Entity")]
    Note,
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Note.def()
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genre::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_genre::Relation::Movie.def().rev())
    }
}

impl Related<super::actor::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_actor::Relation::Actor.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_actor::Relation::Movie.def().rev())
    }
}

impl Related<super::director::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_director::Relation::Director.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_director::Relation::Movie.def().rev())
    }
}

impl Related<super::writer::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_writer::Relation::Writer.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_writer::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
