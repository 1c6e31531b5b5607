mod common;

use std::sync::Arc;

use common::{RecordingSink, ids, names, open_db};
use social_network::prelude::*;
use social_network::repository::read_work;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn works_keep_their_authors_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("books_create", sink).await?;
    let books = db.books();

    assert!(
        books
            .create("Good Omens", &names(&["Terry Pratchett", " Neil Gaiman "]))
            .await
    );
    assert!(books.create("Mort", &names(&["Terry Pratchett"])).await);

    let all = books.list_all().await;
    assert!(all.success);
    assert_eq!(ids(&all.items), vec![1, 2]);
    assert_eq!(all.items[0].authors, names(&["Terry Pratchett", "Neil Gaiman"]));

    let mort = books.find(2).await.expect("work 2");
    assert_eq!(mort.title, "Mort");
    assert_eq!(books.find(3).await, None);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invalid_works_are_rejected_without_io() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("books_invalid", Arc::clone(&sink)).await?;
    let books = db.books();
    let before = sink.metrics().len();

    assert!(!books.create("No Authors", &[]).await);
    assert!(!books.create("Blank Author", &names(&["  "])).await);
    assert!(!books.create("Comma", &names(&["Smith, John"])).await);
    assert!(!books.create("  ", &names(&["Someone"])).await);
    assert!(!books.list_by_author_name("   ").await.success);

    assert_eq!(sink.metrics().len(), before);
    assert!(books.list_all().await.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_author_insert_leaves_no_book() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("books_atomic", sink).await?;

    let out = db
        .executor()
        .execute_non_query(
            "raw.insert_book",
            "INSERT INTO sp_insert_book (title, authors) VALUES (?1, ?2)",
            &[
                RowValues::Text("Half Written".into()),
                RowValues::Text(r#"["Ana", "   "]"#.into()),
            ],
        )
        .await;
    assert!(!out.success);

    let empty_list = db
        .executor()
        .execute_non_query(
            "raw.insert_book",
            "INSERT INTO sp_insert_book (title, authors) VALUES (?1, ?2)",
            &[RowValues::Text("Nobody".into()), RowValues::Text("[]".into())],
        )
        .await;
    assert!(!empty_list.success);

    let rows = db
        .executor()
        .execute_query("raw.count", "SELECT id AS ID, title AS TITLE FROM books", &[], read_work)
        .await;
    assert!(rows.success);
    assert!(rows.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rating_filter_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("books_ratings", sink).await?;
    let books = db.books();
    let members = db.members();

    assert!(members.create("Ana").await);
    assert!(books.create("Loved", &names(&["A"])).await);
    assert!(books.create("Meh", &names(&["B"])).await);
    assert!(books.create("Unread", &names(&["C"])).await);

    assert!(books.record_reading(1, 1, Rating::ALot).await);
    assert!(books.record_reading(2, 1, Rating::Nothing).await);

    let alot = books.list_by_reader(1, Some(&[Rating::ALot][..])).await;
    assert_eq!(ids(&alot.items), vec![1]);

    let nothing = books.list_by_reader(1, Some(&[Rating::Nothing][..])).await;
    assert_eq!(ids(&nothing.items), vec![2]);

    let liked = books.list_by_reader(1, Some(&Rating::LIKED[..])).await;
    assert_eq!(ids(&liked.items), vec![1]);

    let all = books.list_by_reader(1, None).await;
    assert_eq!(ids(&all.items), vec![1, 2]);

    let empty_filter = books.list_by_reader(1, Some(&[][..])).await;
    assert_eq!(ids(&empty_filter.items), vec![1, 2]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn readings_need_existing_references() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("books_refs", sink).await?;
    let books = db.books();
    assert!(books.create("Alone", &names(&["X"])).await);

    assert!(!books.record_reading(1, 77, Rating::Little).await);
    assert!(!books.record_reading(0, 1, Rating::Little).await);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn author_search_is_case_sensitive_substring() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(RecordingSink::default());
    let db = open_db("books_author", sink).await?;
    let books = db.books();

    assert!(books.create("Mort", &names(&["Terry Pratchett"])).await);
    assert!(books.create("Coraline", &names(&["Neil Gaiman"])).await);
    assert!(
        books
            .create("Good Omens", &names(&["Terry Pratchett", "Neil Gaiman"]))
            .await
    );

    assert_eq!(ids(&books.list_by_author_name("Pratchett").await.items), vec![1, 3]);
    assert_eq!(ids(&books.list_by_author_name("Neil").await.items), vec![2, 3]);

    let lower = books.list_by_author_name("pratchett").await;
    assert!(lower.success);
    assert!(lower.is_empty());

    // matches stay within one author name
    let spanning = books.list_by_author_name("Pratchett, Neil").await;
    assert!(spanning.success);
    assert!(spanning.is_empty());
    assert!(books.list_by_author_name("tt, N").await.is_empty());
    Ok(())
}
