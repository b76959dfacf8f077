//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns an [Error::DuplicateCategoryName] if a category with the same name
/// already exists, or an [Error::SqlError] if there is some other SQL error.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    connection
        .execute("INSERT INTO category (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve a single category by its exact name, if it exists.
fn get_category_by_name(
    name: &CategoryName,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE name = :name;")?
        .query_row(&[(":name", name.as_ref())], map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Map a category name to its row, creating the category on first use.
///
/// Lookup and insert are not atomic across server processes, so the UNIQUE
/// constraint on the name arbitrates the create race: losing the race means
/// another writer inserted the name first, and the winner's row is re-read
/// and reused. If the re-read comes back empty the conflict is surfaced.
pub fn resolve_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    if let Some(category) = get_category_by_name(&name, connection)? {
        return Ok(category);
    }

    match create_category(name.clone(), connection) {
        Ok(category) => Ok(category),
        Err(Error::DuplicateCategoryName(_)) => get_category_by_name(&name, connection)?
            .ok_or_else(|| Error::DuplicateCategoryName(name.to_string())),
        Err(error) => Err(error),
    }
}

/// Update a category's name. Returns the renamed category.
///
/// # Errors
/// Returns an [Error::UpdateMissingCategory] if the category doesn't exist,
/// or an [Error::DuplicateCategoryName] if the new name is already in use.
pub fn update_category(
    category_id: CategoryId,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2",
            (new_name.as_ref(), category_id),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(new_name.to_string()),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(Category {
        id: category_id,
        name: new_name,
    })
}

/// Delete a category by ID. Returns an error if the category doesn't exist.
///
/// Transactions referencing the category keep their rows; the foreign key
/// action sets their category reference to NULL.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{
            CategoryName, create_category, create_category_table, delete_category,
            get_all_categories, get_category, resolve_category, update_category,
        },
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_category_table(&connection).expect("Could not create category table");
        connection
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Categorically a category").unwrap();

        let category = create_category(name.clone(), &connection);

        let got_category = category.expect("Could not create category");
        assert!(got_category.id > 0);
        assert_eq!(got_category.name, name);
    }

    #[test]
    fn create_category_fails_on_duplicate_name() {
        let connection = get_test_db_connection();
        let name = CategoryName::new_unchecked("Food");
        create_category(name.clone(), &connection).expect("Could not create category");

        let duplicate = create_category(name, &connection);

        assert_eq!(
            duplicate,
            Err(Error::DuplicateCategoryName("Food".to_string()))
        );
    }

    #[test]
    fn get_category_succeeds() {
        let connection = get_test_db_connection();
        let name = CategoryName::new_unchecked("Foo");
        let inserted_category =
            create_category(name, &connection).expect("Could not create test category");

        let selected_category = get_category(inserted_category.id, &connection);

        assert_eq!(Ok(inserted_category), selected_category);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let inserted_category = create_category(CategoryName::new_unchecked("Foo"), &connection)
            .expect("Could not create test category");

        let selected_category = get_category(inserted_category.id + 123, &connection);

        assert_eq!(selected_category, Err(Error::NotFound));
    }

    #[test]
    fn get_all_categories_orders_by_name() {
        let connection = get_test_db_connection();
        let zebra = create_category(CategoryName::new_unchecked("Zebra"), &connection)
            .expect("Could not create test category");
        let alpha = create_category(CategoryName::new_unchecked("Alpha"), &connection)
            .expect("Could not create test category");

        let categories = get_all_categories(&connection).expect("Could not get all categories");

        assert_eq!(categories, vec![alpha, zebra]);
    }

    #[test]
    fn resolve_category_reuses_an_existing_name() {
        let connection = get_test_db_connection();
        let existing = create_category(CategoryName::new_unchecked("Salary"), &connection)
            .expect("Could not create test category");

        let resolved = resolve_category(CategoryName::new_unchecked("Salary"), &connection)
            .expect("Could not resolve category");

        assert_eq!(resolved, existing);
    }

    #[test]
    fn resolve_category_creates_a_new_name() {
        let connection = get_test_db_connection();

        let resolved = resolve_category(CategoryName::new_unchecked("Salary"), &connection)
            .expect("Could not resolve category");

        assert_eq!(
            get_category(resolved.id, &connection),
            Ok(resolved.clone()),
            "resolved category should exist in the database"
        );
        assert_eq!(resolved.name, CategoryName::new_unchecked("Salary"));
    }

    #[test]
    fn resolve_category_is_case_sensitive() {
        let connection = get_test_db_connection();
        let lower = resolve_category(CategoryName::new_unchecked("food"), &connection)
            .expect("Could not resolve category");

        let upper = resolve_category(CategoryName::new_unchecked("Food"), &connection)
            .expect("Could not resolve category");

        assert_ne!(lower.id, upper.id);
    }

    #[test]
    fn update_category_succeeds() {
        let connection = get_test_db_connection();
        let category = create_category(CategoryName::new_unchecked("Original"), &connection)
            .expect("Could not create test category");

        let new_name = CategoryName::new_unchecked("Updated");
        let updated = update_category(category.id, new_name.clone(), &connection)
            .expect("Could not update category");

        assert_eq!(updated.name, new_name);
        assert_eq!(updated.id, category.id);
        assert_eq!(get_category(category.id, &connection), Ok(updated));
    }

    #[test]
    fn update_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let invalid_id = 999999;

        let result = update_category(invalid_id, CategoryName::new_unchecked("Updated"), &connection);

        assert_eq!(result, Err(Error::UpdateMissingCategory));
    }

    #[test]
    fn update_category_fails_on_duplicate_name() {
        let connection = get_test_db_connection();
        create_category(CategoryName::new_unchecked("Food"), &connection)
            .expect("Could not create test category");
        let transport = create_category(CategoryName::new_unchecked("Transport"), &connection)
            .expect("Could not create test category");

        let result = update_category(transport.id, CategoryName::new_unchecked("Food"), &connection);

        assert_eq!(
            result,
            Err(Error::DuplicateCategoryName("Food".to_string()))
        );
    }

    #[test]
    fn delete_category_succeeds() {
        let connection = get_test_db_connection();
        let category = create_category(CategoryName::new_unchecked("ToDelete"), &connection)
            .expect("Could not create test category");

        let result = delete_category(category.id, &connection);

        assert!(result.is_ok());
        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let invalid_id = 999999;

        let result = delete_category(invalid_id, &connection);

        assert_eq!(result, Err(Error::DeleteMissingCategory));
    }
}
