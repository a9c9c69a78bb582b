//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them
//! for compile-time query validation and type-safe SQL generation. When a
//! migration changes the schema, update this file to match (or regenerate
//! it with `diesel print-schema` against a migrated database).

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login email, compared byte-exact.
        #[max_length = 100]
        email -> Varchar,
        /// Salted one-way password hash (PHC string).
        #[max_length = 255]
        password_hash -> Varchar,
        /// Display name shown on posts and comments.
        #[max_length = 100]
        name -> Varchar,
        /// Role label: RootUser, Admin, or Visitor.
        #[max_length = 25]
        role -> Varchar,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Published blog posts.
    blog_posts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique headline.
        #[max_length = 250]
        title -> Varchar,
        /// Secondary headline.
        #[max_length = 250]
        subtitle -> Varchar,
        /// Full post body.
        body -> Text,
        /// Header image reference.
        #[max_length = 250]
        image_url -> Varchar,
        /// Human-facing publication date string.
        #[max_length = 250]
        published_on -> Varchar,
        /// Current author; reassigned when the post is edited.
        author_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reader comments attached to posts.
    comments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Comment text.
        #[max_length = 1000]
        body -> Varchar,
        /// The commenting user.
        commentator_id -> Uuid,
        /// The commented post.
        post_id -> Uuid,
        /// Submission timestamp; post pages list newest first.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(blog_posts -> users (author_id));
diesel::joinable!(comments -> blog_posts (post_id));
diesel::joinable!(comments -> users (commentator_id));

diesel::allow_tables_to_appear_in_same_query!(users, blog_posts, comments);
