use sqlx::{SqliteExecutor, SqlitePool};

use crate::{
    forms::NewFriend,
    models::{Energy, Friend},
};

const SQL_SELECT_FRIENDS: &str = r#"
SELECT id, name, energy, event_id
FROM friends
ORDER BY id
"#;

const SQL_SELECT_FRIEND: &str = r#"
SELECT id, name, energy, event_id
FROM friends
WHERE id = ?1
"#;

const SQL_INSERT_FRIEND: &str = r#"
INSERT INTO friends (name, energy, event_id)
VALUES (?1, ?2, NULL)
RETURNING id, name, energy, event_id
"#;

pub async fn list(db_pool: &SqlitePool) -> sqlx::Result<Vec<Friend>> {
    sqlx::query_as(SQL_SELECT_FRIENDS).fetch_all(db_pool).await
}

pub async fn get<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> sqlx::Result<Option<Friend>> {
    sqlx::query_as(SQL_SELECT_FRIEND)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn insert(db_pool: &SqlitePool, new_friend: &NewFriend) -> sqlx::Result<Friend> {
    sqlx::query_as(SQL_INSERT_FRIEND)
        .bind(&new_friend.name)
        .bind(new_friend.energy)
        .fetch_one(db_pool)
        .await
}

/// Deletes a friend. Their messages, rides and driven carpools go with them.
/// Returns false if there was no such friend.
pub async fn delete(db_pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM friends WHERE id = ?1")
        .bind(id)
        .execute(db_pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Applies every energy change or none of them.
pub async fn update_energies(db_pool: &SqlitePool, updates: &[(i64, Energy)]) -> sqlx::Result<()> {
    let mut tx = db_pool.begin().await?;
    for (id, energy) in updates {
        sqlx::query("UPDATE friends SET energy = ?1 WHERE id = ?2")
            .bind(energy)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{chats, events, test_pool};
    use crate::models::Timestamp;

    async fn add(db_pool: &SqlitePool, name: &str, energy: Energy) -> Friend {
        insert(db_pool, &NewFriend { name: name.to_owned(), energy }).await.unwrap()
    }

    #[tokio::test]
    async fn insert_and_list_in_id_order() {
        let db_pool = test_pool().await;
        let cass = add(&db_pool, "Cass", Energy::High).await;
        let bryan = add(&db_pool, "Bryan", Energy::Medium).await;

        assert_eq!(cass.energy, Energy::High);
        assert_eq!(cass.event_id, None);
        assert_eq!(list(&db_pool).await.unwrap(), vec![cass.clone(), bryan]);
        assert_eq!(get(&db_pool, cass.id).await.unwrap(), Some(cass));
    }

    #[tokio::test]
    async fn delete_cascades_to_messages() {
        let db_pool = test_pool().await;
        let chat = chats::get_or_create(&db_pool, "general").await.unwrap();
        let mikey = add(&db_pool, "Mikey", Energy::Low).await;
        chats::insert_message(&db_pool, chat.id, mikey.id, "Toughness", Timestamp::now())
            .await
            .unwrap();

        assert!(delete(&db_pool, mikey.id).await.unwrap());
        assert!(!delete(&db_pool, mikey.id).await.unwrap());
        assert!(chats::messages(&db_pool, chat.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_an_event_only_clears_the_link() {
        let db_pool = test_pool().await;
        let event = events::get_or_create_by_slug(&db_pool, "pizza", "Pizza").await.unwrap();
        let cass = add(&db_pool, "Cass", Energy::High).await;
        sqlx::query("UPDATE friends SET event_id = ?1 WHERE id = ?2")
            .bind(event.id)
            .bind(cass.id)
            .execute(&db_pool)
            .await
            .unwrap();
        assert_eq!(get(&db_pool, cass.id).await.unwrap().unwrap().event_id, Some(event.id));

        sqlx::query("DELETE FROM events WHERE id = ?1")
            .bind(event.id)
            .execute(&db_pool)
            .await
            .unwrap();

        let cass = get(&db_pool, cass.id).await.unwrap().expect("friend survives");
        assert_eq!(cass.event_id, None);
    }

    #[tokio::test]
    async fn update_energies_changes_each_listed_friend() {
        let db_pool = test_pool().await;
        let cass = add(&db_pool, "Cass", Energy::High).await;
        let bryan = add(&db_pool, "Bryan", Energy::Medium).await;

        update_energies(&db_pool, &[(cass.id, Energy::Low)]).await.unwrap();

        let energies: Vec<Energy> = list(&db_pool).await.unwrap().iter().map(|f| f.energy).collect();
        assert_eq!(energies, vec![Energy::Low, bryan.energy]);
    }
}
