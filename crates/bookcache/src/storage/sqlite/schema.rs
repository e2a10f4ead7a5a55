//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Column order in every `SELECT` matches the order
//! expected by the row conversions.

/// SQL statement to create all tables.
///
/// Foreign keys are off by default in SQLite and the pragma is per
/// connection, so it runs alongside the table definitions.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    bio TEXT,
    birth_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    publish_date TEXT NOT NULL,
    author_id INTEGER NOT NULL,
    FOREIGN KEY (author_id) REFERENCES authors(id)
);

CREATE INDEX IF NOT EXISTS idx_authors_name ON authors(name);
CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id);
"#;

// Author queries
pub const SELECT_AUTHOR_BY_ID: &str = r#"
SELECT id, name, bio, birth_date
FROM authors
WHERE id = ?1
"#;

pub const SELECT_AUTHORS_PAGE: &str = r#"
SELECT id, name, bio, birth_date
FROM authors
ORDER BY id
LIMIT ?1 OFFSET ?2
"#;

pub const COUNT_AUTHORS: &str = "SELECT COUNT(*) FROM authors";

pub const INSERT_AUTHOR: &str = r#"
INSERT INTO authors (name, bio, birth_date)
VALUES (?1, ?2, ?3)
"#;

pub const UPDATE_AUTHOR: &str = r#"
UPDATE authors
SET name = ?2, bio = ?3, birth_date = ?4
WHERE id = ?1
"#;

pub const DELETE_AUTHOR: &str = r#"
DELETE FROM authors
WHERE id = ?1
"#;

// Book queries
pub const SELECT_BOOK_BY_ID: &str = r#"
SELECT id, title, description, publish_date, author_id
FROM books
WHERE id = ?1
"#;

pub const SELECT_BOOKS_PAGE: &str = r#"
SELECT id, title, description, publish_date, author_id
FROM books
ORDER BY id
LIMIT ?1 OFFSET ?2
"#;

pub const SELECT_BOOKS_BY_AUTHOR: &str = r#"
SELECT id, title, description, publish_date, author_id
FROM books
WHERE author_id = ?1
ORDER BY id
"#;

pub const COUNT_BOOKS: &str = "SELECT COUNT(*) FROM books";

pub const INSERT_BOOK: &str = r#"
INSERT INTO books (title, description, publish_date, author_id)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const UPDATE_BOOK: &str = r#"
UPDATE books
SET title = ?2, description = ?3, publish_date = ?4, author_id = ?5
WHERE id = ?1
"#;

pub const DELETE_BOOK: &str = r#"
DELETE FROM books
WHERE id = ?1
"#;
