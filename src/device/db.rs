//! Database operations for devices.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    device::{Device, DeviceError, DeviceInfo, DeviceToken},
    user::UserID,
};

/// Create the device table.
pub fn create_device_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS device (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            token TEXT NOT NULL,
            model TEXT NOT NULL,
            os TEXT NOT NULL,
            activated INTEGER NOT NULL DEFAULT 1,
            UNIQUE(user_id, token),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );",
    )?;

    Ok(())
}

/// Register `new_token` for `user_id`.
///
/// When `origin_token` equals `new_token` the token is registered, or the
/// existing device with that token is refreshed and reactivated. Otherwise
/// the device holding `origin_token` is given `new_token`.
///
/// # Errors
/// Returns [DeviceError::NotFound] if the tokens differ and the user has no
/// device with `origin_token`.
pub fn register_device(
    user_id: UserID,
    origin_token: &DeviceToken,
    new_token: &DeviceToken,
    info: &DeviceInfo,
    connection: &mut Connection,
) -> Result<Device, Error> {
    let transaction = connection.transaction()?;

    let existing = find_device(user_id, origin_token.as_ref(), &transaction)?;

    let device_id = match existing {
        Some(device) => {
            if origin_token != new_token {
                // The new token may already be registered on a stale row.
                transaction.execute(
                    "DELETE FROM device WHERE user_id = ?1 AND token = ?2 AND id <> ?3",
                    (user_id.as_i64(), new_token.as_ref(), device.id),
                )?;
            }

            transaction.execute(
                "UPDATE device SET token = ?1, model = ?2, os = ?3, activated = 1 WHERE id = ?4",
                (new_token.as_ref(), &info.model, &info.os, device.id),
            )?;

            device.id
        }
        None if origin_token == new_token => {
            transaction.execute(
                "INSERT INTO device (user_id, token, model, os) VALUES (?1, ?2, ?3, ?4)",
                (user_id.as_i64(), new_token.as_ref(), &info.model, &info.os),
            )?;

            transaction.last_insert_rowid()
        }
        None => return Err(DeviceError::NotFound.into()),
    };

    let device = find_device(user_id, new_token.as_ref(), &transaction)?
        .ok_or(DeviceError::NotFound)?;
    transaction.commit()?;

    tracing::debug!("Registered device {device_id} for user {user_id}");

    Ok(device)
}

/// Remove the device of `user_id` that holds `token`.
///
/// # Errors
/// Returns [DeviceError::NotFound] if the user has no device with `token`.
pub fn delete_device(
    user_id: UserID,
    token: &DeviceToken,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM device WHERE user_id = ?1 AND token = ?2",
        (user_id.as_i64(), token.as_ref()),
    )?;

    if rows_affected == 0 {
        return Err(DeviceError::NotFound.into());
    }

    Ok(())
}

/// Get the device of `user_id` that holds `token`.
pub fn find_device(
    user_id: UserID,
    token: &str,
    connection: &Connection,
) -> Result<Option<Device>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, token, model, os, activated FROM device
            WHERE user_id = :user_id AND token = :token",
        )?
        .query_row(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":token": token,
            },
            map_row,
        )
        .optional()
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<Device, rusqlite::Error> {
    Ok(Device {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        token: row.get(2)?,
        model: row.get(3)?,
        os: row.get(4)?,
        activated: row.get(5)?,
    })
}

#[cfg(test)]
mod device_db_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        device::{DeviceError, DeviceInfo, DeviceToken},
        test_utils::{get_test_connection, insert_test_user},
        user::UserID,
    };

    use super::{delete_device, find_device, register_device};

    fn token(raw: &str) -> DeviceToken {
        DeviceToken::new(raw).unwrap()
    }

    fn info(model: &str) -> DeviceInfo {
        DeviceInfo {
            model: model.to_owned(),
            os: "iOS".to_owned(),
        }
    }

    fn setup() -> (Connection, UserID) {
        let connection = get_test_connection();
        let user = insert_test_user("pennyway", &connection);

        (connection, user.id)
    }

    #[test]
    fn same_tokens_register_new_device() {
        let (mut connection, user_id) = setup();

        let device = register_device(
            user_id,
            &token("first"),
            &token("first"),
            &info("iPhone 15"),
            &mut connection,
        )
        .unwrap();

        assert_eq!(device.token, "first");
        assert_eq!(device.model, "iPhone 15");
        assert!(device.activated);
    }

    #[test]
    fn same_tokens_refresh_existing_device() {
        let (mut connection, user_id) = setup();
        let first = register_device(
            user_id,
            &token("first"),
            &token("first"),
            &info("iPhone 15"),
            &mut connection,
        )
        .unwrap();
        connection
            .execute("UPDATE device SET activated = 0", ())
            .unwrap();

        let second = register_device(
            user_id,
            &token("first"),
            &token("first"),
            &info("iPhone 16"),
            &mut connection,
        )
        .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.model, "iPhone 16");
        assert!(second.activated);
    }

    #[test]
    fn different_tokens_replace_origin_token() {
        let (mut connection, user_id) = setup();
        let original = register_device(
            user_id,
            &token("old"),
            &token("old"),
            &info("Pixel"),
            &mut connection,
        )
        .unwrap();

        let updated = register_device(
            user_id,
            &token("old"),
            &token("new"),
            &info("Pixel"),
            &mut connection,
        )
        .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.token, "new");
        assert_eq!(find_device(user_id, "old", &connection), Ok(None));
    }

    #[test]
    fn different_tokens_without_origin_device_fail() {
        let (mut connection, user_id) = setup();

        let result = register_device(
            user_id,
            &token("missing"),
            &token("new"),
            &info("Pixel"),
            &mut connection,
        );

        assert_eq!(result, Err(Error::Device(DeviceError::NotFound)));
        assert_eq!(find_device(user_id, "new", &connection), Ok(None));
    }

    #[test]
    fn tokens_are_scoped_to_user() {
        let (mut connection, user_id) = setup();
        let other = insert_test_user("otheruser", &connection);
        register_device(
            other.id,
            &token("shared"),
            &token("shared"),
            &info("Pixel"),
            &mut connection,
        )
        .unwrap();

        assert_eq!(
            delete_device(user_id, &token("shared"), &connection),
            Err(Error::Device(DeviceError::NotFound))
        );
        assert_eq!(delete_device(other.id, &token("shared"), &connection), Ok(()));
    }
}
