//! SQL for both repos. Statements are prepared per pooled connection through
//! `prepare_cached`, since a prepared statement can't outlive the connection it was
//! prepared on.

use const_format::concatcp;

pub mod topic {
    use super::*;

    const COLUMNS: &str = "id, name, slug, created_at, updated_at";

    pub const GET: &str =
        concatcp!("select ", COLUMNS, " from topic where id = $1 and deleted_at is null");

    pub const LIST: &str = concatcp!(
        "select ",
        COLUMNS,
        " from topic where deleted_at is null",
        " and ($1::text is null or name ilike $1 or slug ilike $1)",
        " order by created_at, id"
    );

    pub const CREATE: &str = concatcp!(
        "insert into topic (id, name, slug, created_at, updated_at) values ($1, $2, $3, now(), now()) returning ",
        COLUMNS
    );

    pub const UPDATE: &str = concatcp!(
        "update topic set name = $2, slug = $3, updated_at = now() where id = $1 and deleted_at is null returning ",
        COLUMNS
    );

    pub const DELETE: &str =
        "update topic set deleted_at = now() where id = $1 and deleted_at is null";
}

pub mod news {
    use super::*;

    // summaries follow link order, news_topic ids are v7 and minted in request order.
    // topics soft deleted after being attached are left out, so are rows of deleted news
    // since every query below filters on n.deleted_at
    const TOPICS: &str = "coalesce((\
        select json_agg(json_build_object(\
            'id', t.id, 'name', t.name, 'slug', t.slug, \
            'created_at', t.created_at, 'updated_at', t.updated_at\
        ) order by nt.id) \
        from news_topic nt join topic t on t.id = nt.topic_id \
        where nt.news_id = n.id and t.deleted_at is null\
    ), '[]'::json) as topics";

    const SELECT: &str = concatcp!(
        "select n.id, n.title, n.slug, n.status, n.content, n.created_at, n.updated_at, ",
        TOPICS,
        " from news n"
    );

    pub const GET: &str = concatcp!(SELECT, " where n.id = $1 and n.deleted_at is null");

    pub const LIST: &str = concatcp!(
        SELECT,
        " where n.deleted_at is null",
        " and ($1::text is null or n.title ilike $1 or n.content ilike $1)",
        " order by n.created_at, n.id"
    );

    pub const CREATE: &str = "insert into news (id, title, slug, status, content, created_at, updated_at) \
        values ($1, $2, $3, $4, $5, now(), now())";

    pub const UPDATE: &str = "update news set title = $2, slug = $3, status = $4, content = $5, updated_at = now() \
        where id = $1 and deleted_at is null";

    pub const DELETE: &str =
        "update news set deleted_at = now() where id = $1 and deleted_at is null";

    pub const CLEAR_TOPICS: &str = "delete from news_topic where news_id = $1";

    pub const TOPIC_TABLE: &str = "news_topic";
    pub const TOPIC_COLUMNS: [&str; 3] = ["id", "news_id", "topic_id"];
}

/// Turns a search string into an `ilike` pattern matching it anywhere, with the
/// pattern's own wildcards escaped so they match literally.
pub fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
