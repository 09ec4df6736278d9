// tests/postgres_tests.rs
//
// Exercises `PgStore` against a real database. Skipped unless DATABASE_URL is set.

use qa_admin::{
    error::AppError,
    models::{
        avatar::AvatarInput,
        category::CategoryInput,
        question::{AnswerOption, Difficulty, NewQuestion, QuestionUpdate},
    },
    store::{PgStore, Store},
};
use sqlx::postgres::PgPoolOptions;

async fn store() -> Option<PgStore> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres store tests");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    Some(PgStore::new(pool))
}

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

fn new_question(category_id: i64) -> NewQuestion {
    NewQuestion {
        question: unique("q"),
        option_a: "a".to_string(),
        option_b: "b".to_string(),
        option_c: "c".to_string(),
        option_d: "d".to_string(),
        correct_answer: AnswerOption::D,
        difficulty: Difficulty::Hard,
        category_id,
    }
}

#[tokio::test]
async fn category_round_trip() {
    let Some(store) = store().await else { return };

    let input = CategoryInput {
        name: unique("Prayer"),
        image: Some(String::new()),
    };
    let created = store.create_category(&input).await.unwrap();
    let fetched = store.get_category(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.image.as_deref(), Some(""));

    let update = CategoryInput {
        name: unique("Salah"),
        image: Some("https://x/img.png".to_string()),
    };
    let updated = store.update_category(created.id, &update).await.unwrap();
    assert_eq!(updated.name, update.name);
    assert_eq!(updated.image, update.image);

    store.delete_category(created.id).await.unwrap();
    assert!(store.get_category(created.id).await.unwrap().is_none());
    assert!(matches!(
        store.delete_category(created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn avatars_listed_by_id() {
    let Some(store) = store().await else { return };

    let first = store
        .create_avatar(&AvatarInput { url: "https://cdn.test/1.png".to_string() })
        .await
        .unwrap();
    let second = store
        .create_avatar(&AvatarInput { url: "https://cdn.test/2.png".to_string() })
        .await
        .unwrap();

    let ids: Vec<i64> = store.list_avatars().await.unwrap().iter().map(|a| a.id).collect();
    let first_pos = ids.iter().position(|id| *id == first.id).unwrap();
    let second_pos = ids.iter().position(|id| *id == second.id).unwrap();
    assert!(first_pos < second_pos);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    store.delete_avatar(first.id).await.unwrap();
    store.delete_avatar(second.id).await.unwrap();
}

#[tokio::test]
async fn question_join_and_foreign_keys() {
    let Some(store) = store().await else { return };

    let category = store
        .create_category(&CategoryInput { name: unique("Numbers"), image: None })
        .await
        .unwrap();

    let created = store.create_question(&new_question(category.id)).await.unwrap();
    assert!(created.is_active);

    let joined = store.get_question(created.id).await.unwrap().unwrap();
    assert_eq!(joined.question, created);
    assert_eq!(joined.category, category);

    let update = QuestionUpdate {
        fields: NewQuestion {
            correct_answer: AnswerOption::A,
            difficulty: Difficulty::Easy,
            ..new_question(category.id)
        },
        is_active: false,
    };
    let updated = store.update_question(created.id, &update).await.unwrap();
    assert_eq!(updated.correct_answer, AnswerOption::A);
    assert_eq!(updated.difficulty, Difficulty::Easy);
    assert!(!updated.is_active);

    assert!(matches!(
        store.create_question(&new_question(i64::MAX)).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        store.delete_category(category.id).await,
        Err(AppError::Conflict(_))
    ));

    store.delete_question(created.id).await.unwrap();
    store.delete_category(category.id).await.unwrap();
}

#[tokio::test]
async fn category_names_sort_by_bytes() {
    let Some(store) = store().await else { return };

    let suffix = unique("");
    let mut ids = Vec::new();
    for name in ["banana", "Cherry", "apple"] {
        let category = store
            .create_category(&CategoryInput { name: format!("{name}{suffix}"), image: None })
            .await
            .unwrap();
        ids.push(category.id);
    }

    let names: Vec<String> = store
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .filter(|c| ids.contains(&c.id))
        .map(|c| c.name)
        .collect();
    assert_eq!(
        names,
        vec![
            format!("Cherry{suffix}"),
            format!("apple{suffix}"),
            format!("banana{suffix}"),
        ]
    );

    for id in ids {
        store.delete_category(id).await.unwrap();
    }
}

#[tokio::test]
async fn questions_listed_newest_first() {
    let Some(store) = store().await else { return };

    let category = store
        .create_category(&CategoryInput { name: unique("Ordering"), image: None })
        .await
        .unwrap();
    let older = store.create_question(&new_question(category.id)).await.unwrap();
    let newer = store.create_question(&new_question(category.id)).await.unwrap();

    let listed: Vec<_> = store
        .list_questions()
        .await
        .unwrap()
        .into_iter()
        .filter(|q| q.category.id == category.id)
        .collect();
    let ids: Vec<i64> = listed.iter().map(|q| q.question.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    assert!(listed.iter().all(|q| q.category == category));

    store.delete_question(older.id).await.unwrap();
    store.delete_question(newer.id).await.unwrap();
    store.delete_category(category.id).await.unwrap();
}
