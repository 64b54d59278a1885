use glimmerdrift::notifications::{Feed, NotificationKind};
use glimmerdrift::ocean::{self, like_bottle, throw_bottle, Bottle};
use glimmerdrift::{db, DriftError};
use sqlx::SqlitePool;
use tokio::sync::broadcast;

async fn pool() -> SqlitePool {
    let pool = db::pool_options("sqlite::memory:")
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::init(&pool).await.unwrap();
    pool
}

#[tokio::test]
async fn seeding_happens_once() {
    let pool = pool().await;

    let seeded = ocean::load_bottles(&pool).await.unwrap();
    assert_eq!(seeded.len(), 6);
    assert!(seeded.iter().all(|b| b.sender_name == "Anonymous"));
    assert!(seeded.iter().all(|b| (0..=5).contains(&b.likes)));

    // a second init against the same ledger must not seed again
    db::init(&pool).await.unwrap();
    assert_eq!(ocean::load_bottles(&pool).await.unwrap().len(), 6);
}

#[tokio::test]
async fn each_throw_adds_one_bottle_newest_first() {
    let pool = pool().await;
    let before = ocean::load_bottles(&pool).await.unwrap().len();

    let first = throw_bottle(&pool, "first", "alice").await.unwrap();
    let second = throw_bottle(&pool, "second", "alice").await.unwrap();
    let third = throw_bottle(&pool, "third", "bob").await.unwrap();

    let bottles = ocean::load_bottles(&pool).await.unwrap();
    assert_eq!(bottles.len(), before + 3);

    let newest: Vec<&str> = bottles[..3].iter().map(|b| b.id.as_str()).collect();
    assert_eq!(newest, [&third.id, &second.id, &first.id]);
    assert_eq!(bottles[0].likes, 0);
    assert_eq!(bottles[0].sender_name, "bob");
}

#[tokio::test]
async fn like_bumps_the_counter_and_the_feed() {
    let pool = pool().await;
    let feed = Feed::default();

    let bottle = throw_bottle(&pool, "一起去图书馆吗？今晚七点老地方", "alice")
        .await
        .unwrap();

    like_bottle(&pool, &feed, &bottle.id).await.unwrap();

    let bottles = ocean::load_bottles(&pool).await.unwrap();
    let liked = bottles.iter().find(|b| b.id == bottle.id).unwrap();
    assert_eq!(liked.likes, 1);

    let notifications = feed.list().await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Like);
    assert_eq!(notifications[0].related_bottle_id.as_deref(), Some(bottle.id.as_str()));
    // the body quotes the first 10 characters
    assert!(notifications[0].content.contains("一起去图书馆吗？今晚"));

    // the ledger itself does not guard against repeats
    like_bottle(&pool, &feed, &bottle.id).await.unwrap();
    let bottles = ocean::load_bottles(&pool).await.unwrap();
    assert_eq!(bottles.iter().find(|b| b.id == bottle.id).unwrap().likes, 2);
}

#[tokio::test]
async fn liking_a_missing_bottle_is_not_found() {
    let pool = pool().await;
    let feed = Feed::default();

    let err = like_bottle(&pool, &feed, "no-such-bottle").await.unwrap_err();
    assert!(matches!(err, DriftError::NotFound(id) if id == "no-such-bottle"));
    assert!(feed.list().await.is_empty());
}

#[tokio::test]
async fn publish_pushes_the_ledger_to_subscribers() {
    let pool = pool().await;
    let (tide, mut rx) = broadcast::channel(8);

    let bottle = throw_bottle(&pool, "hello out there", "alice").await.unwrap();
    ocean::publish_tide(&pool, &tide).await.unwrap();

    let payload = rx.recv().await.unwrap();
    let snapshot: Vec<Bottle> = serde_json::from_str(&payload).unwrap();
    assert_eq!(snapshot[0].id, bottle.id);
    assert_eq!(snapshot.len(), ocean::load_bottles(&pool).await.unwrap().len());
}
