//! Post entity for SeaORM.
//!
//! Likes and comments are embedded as JSONB so every post mutation is a
//! single-row read-modify-write.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use murmur_core::domain::{Comment, Post};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_public: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub likes: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            author_username: model.author_username,
            content: model.content,
            is_public: model.is_public,
            likes: serde_json::from_value::<Vec<Uuid>>(model.likes).unwrap_or_default(),
            comments: serde_json::from_value::<Vec<Comment>>(model.comments).unwrap_or_default(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            author_username: Set(post.author_username),
            content: Set(post.content),
            is_public: Set(post.is_public),
            likes: Set(serde_json::to_value(&post.likes).unwrap_or_else(|_| Json::Array(Vec::new()))),
            comments: Set(serde_json::to_value(&post.comments)
                .unwrap_or_else(|_| Json::Array(Vec::new()))),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
