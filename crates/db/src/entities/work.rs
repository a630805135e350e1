//! Work entity (a creative project owned by an author).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Genre tag of a work.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    #[sea_orm(string_value = "fantasy")]
    Fantasy,
    #[sea_orm(string_value = "science_fiction")]
    ScienceFiction,
    #[sea_orm(string_value = "romance")]
    Romance,
    #[sea_orm(string_value = "mystery")]
    Mystery,
    #[sea_orm(string_value = "horror")]
    Horror,
    #[sea_orm(string_value = "adventure")]
    Adventure,
    #[sea_orm(string_value = "drama")]
    Drama,
    #[sea_orm(string_value = "comedy")]
    Comedy,
    #[default]
    #[sea_orm(string_value = "other")]
    Other,
}

/// Intended audience of a work.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    #[sea_orm(string_value = "general")]
    General,
    #[sea_orm(string_value = "teen")]
    Teen,
    #[sea_orm(string_value = "mature")]
    Mature,
    #[sea_orm(string_value = "explicit")]
    Explicit,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning author
    #[sea_orm(indexed)]
    pub author_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub genre: Genre,

    pub audience: Audience,

    /// Fandom this work belongs to, if any
    #[sea_orm(nullable, indexed)]
    pub fandom_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id",
        on_delete = "Cascade"
    )]
    Author,

    #[sea_orm(
        belongs_to = "super::fandom::Entity",
        from = "Column::FandomId",
        to = "super::fandom::Column::Id",
        on_delete = "SetNull"
    )]
    Fandom,

    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::fandom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fandom.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
