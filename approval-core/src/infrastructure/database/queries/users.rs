/// Insert a new directory user.
pub const USER_INSERT: &str = r#"
    INSERT INTO users (username, role, dept, manager_id, dept_id, position, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

pub const USER_FIND_BY_ID: &str = r#"
    SELECT id, username, role, dept, manager_id, dept_id, position, created_at
    FROM users
    WHERE id = ?
"#;

pub const USER_FIND_BY_USERNAME: &str = r#"
    SELECT id, username, role, dept, manager_id, dept_id, position, created_at
    FROM users
    WHERE username = ?
"#;

pub const USERS_LIST: &str = r#"
    SELECT id, username, role, dept, manager_id, dept_id, position, created_at
    FROM users
    ORDER BY id ASC
"#;

/// Full profile update; callers load-and-merge before writing.
pub const USER_UPDATE_PROFILE: &str = r#"
    UPDATE users
    SET dept = ?, manager_id = ?, role = ?, dept_id = ?, position = ?
    WHERE id = ?
"#;

pub const USER_COUNT: &str = "SELECT COUNT(1) FROM users";
