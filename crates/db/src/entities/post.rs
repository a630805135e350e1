//! Post entity (text, image or share attached to a work).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Posting user
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Work the post is filed under
    #[sea_orm(indexed)]
    pub work_id: String,

    pub title: String,

    /// Body text, empty when the post is image-only or a share
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Image URL
    #[sea_orm(nullable)]
    pub image: Option<String>,

    /// Post being shared
    #[sea_orm(nullable, indexed)]
    pub shared_post_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether this post carries anything besides its title.
    #[must_use]
    pub fn has_body(&self) -> bool {
        !self.content.trim().is_empty() || self.image.is_some() || self.shared_post_id.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::work::Entity",
        from = "Column::WorkId",
        to = "super::work::Column::Id",
        on_delete = "Cascade"
    )]
    Work,

    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::SharedPostId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    SharedPost,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::work::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Work.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
