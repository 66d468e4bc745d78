use sqlx::SqlitePool;

use crate::models::{Chat, Message, Timestamp};

const SQL_INSERT_CHAT_IF_ABSENT: &str = r#"
INSERT INTO chats (name) VALUES (?1)
ON CONFLICT (name) DO NOTHING
"#;

const SQL_SELECT_MESSAGES: &str = r#"
SELECT m.id, m.chat_id, m.text, m.sender_id, f.name AS sender_name, m.created_at
FROM messages m
JOIN friends f ON f.id = m.sender_id
WHERE m.chat_id = ?1
ORDER BY m.created_at, m.id
"#;

const SQL_SELECT_RECENT_MESSAGES: &str = r#"
SELECT * FROM (
    SELECT m.id, m.chat_id, m.text, m.sender_id, f.name AS sender_name, m.created_at
    FROM messages m
    JOIN friends f ON f.id = m.sender_id
    WHERE m.chat_id = ?1
    ORDER BY m.created_at DESC, m.id DESC
    LIMIT ?2
)
ORDER BY created_at, id
"#;

const SQL_INSERT_MESSAGE: &str = r#"
INSERT INTO messages (text, sender_id, chat_id, created_at)
VALUES (?1, ?2, ?3, ?4)
"#;

pub async fn get_or_create(db_pool: &SqlitePool, name: &str) -> sqlx::Result<Chat> {
    sqlx::query(SQL_INSERT_CHAT_IF_ABSENT)
        .bind(name)
        .execute(db_pool)
        .await?;

    sqlx::query_as("SELECT id, name FROM chats WHERE name = ?1")
        .bind(name)
        .fetch_one(db_pool)
        .await
}

/// Every message in the room, oldest first. Same-second messages keep insert order.
pub async fn messages(db_pool: &SqlitePool, chat_id: i64) -> sqlx::Result<Vec<Message>> {
    sqlx::query_as(SQL_SELECT_MESSAGES)
        .bind(chat_id)
        .fetch_all(db_pool)
        .await
}

/// The newest `limit` messages, still oldest first.
pub async fn recent_messages(db_pool: &SqlitePool, chat_id: i64, limit: u32) -> sqlx::Result<Vec<Message>> {
    sqlx::query_as(SQL_SELECT_RECENT_MESSAGES)
        .bind(chat_id)
        .bind(limit)
        .fetch_all(db_pool)
        .await
}

pub async fn insert_message(
    db_pool: &SqlitePool,
    chat_id: i64,
    sender_id: i64,
    text: &str,
    created_at: Timestamp,
) -> sqlx::Result<i64> {
    let result = sqlx::query(SQL_INSERT_MESSAGE)
        .bind(text)
        .bind(sender_id)
        .bind(chat_id)
        .bind(created_at)
        .execute(db_pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn delete_message(db_pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM messages WHERE id = ?1")
        .bind(id)
        .execute(db_pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_messages(db_pool: &SqlitePool, chat_id: i64) -> sqlx::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages WHERE chat_id = ?1")
        .bind(chat_id)
        .fetch_one(db_pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{friends, test_pool},
        forms::NewFriend,
        models::Energy,
    };

    #[tokio::test]
    async fn room_is_created_once() {
        let db_pool = test_pool().await;
        let first = get_or_create(&db_pool, "general").await.unwrap();
        let again = get_or_create(&db_pool, "general").await.unwrap();
        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn messages_order_by_time_then_id() {
        let db_pool = test_pool().await;
        let chat = get_or_create(&db_pool, "general").await.unwrap();
        let cass = friends::insert(&db_pool, &NewFriend { name: "Cass".into(), energy: Energy::High })
            .await
            .unwrap();

        let late = insert_message(&db_pool, chat.id, cass.id, "late", Timestamp(200)).await.unwrap();
        let tie_a = insert_message(&db_pool, chat.id, cass.id, "tie a", Timestamp(100)).await.unwrap();
        let tie_b = insert_message(&db_pool, chat.id, cass.id, "tie b", Timestamp(100)).await.unwrap();

        let ids: Vec<i64> = messages(&db_pool, chat.id).await.unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![tie_a, tie_b, late]);

        let recent: Vec<i64> = recent_messages(&db_pool, chat.id, 2).await.unwrap().iter().map(|m| m.id).collect();
        assert_eq!(recent, vec![tie_b, late]);
    }

    #[tokio::test]
    async fn message_times_order_numerically() {
        let db_pool = test_pool().await;
        let chat = get_or_create(&db_pool, "general").await.unwrap();
        let cass = friends::insert(&db_pool, &NewFriend { name: "Cass".into(), energy: Energy::High })
            .await
            .unwrap();

        let ten = insert_message(&db_pool, chat.id, cass.id, "ten", Timestamp(10)).await.unwrap();
        let nine = insert_message(&db_pool, chat.id, cass.id, "nine", Timestamp(9)).await.unwrap();

        let loaded = messages(&db_pool, chat.id).await.unwrap();
        let ids: Vec<i64> = loaded.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![nine, ten]);
        assert_eq!(loaded[0].created_at, Timestamp(9));

        let (kind,): (String,) = sqlx::query_as("SELECT typeof(created_at) FROM messages WHERE id = ?1")
            .bind(ten)
            .fetch_one(&db_pool)
            .await
            .unwrap();
        assert_eq!(kind, "integer");
    }

    #[tokio::test]
    async fn messages_carry_sender_name() {
        let db_pool = test_pool().await;
        let chat = get_or_create(&db_pool, "general").await.unwrap();
        let bryan = friends::insert(&db_pool, &NewFriend { name: "Bryan".into(), energy: Energy::Low })
            .await
            .unwrap();
        let id = insert_message(&db_pool, chat.id, bryan.id, "Ohhhh", Timestamp(5)).await.unwrap();

        let loaded = messages(&db_pool, chat.id).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, id);
        assert_eq!(loaded[0].sender_name, "Bryan");
        assert_eq!(count_messages(&db_pool, chat.id).await.unwrap(), 1);

        assert!(delete_message(&db_pool, id).await.unwrap());
        assert_eq!(count_messages(&db_pool, chat.id).await.unwrap(), 0);
    }
}
