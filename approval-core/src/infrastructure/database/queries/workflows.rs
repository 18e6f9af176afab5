pub const VARIANT_SELECT_FIELDS: &str = r#"
    workflow_key, request_type, name, category, scope_kind, scope_value, enabled, is_default, created_at
"#;

pub const VARIANT_FIND_BY_KEY: &str = r#"
    SELECT workflow_key, request_type, name, category, scope_kind, scope_value, enabled, is_default, created_at
    FROM workflow_variants
    WHERE workflow_key = ?
"#;

/// Enabled variants a creator may choose from: all global ones plus the
/// ones scoped to the creator's dept.
pub const VARIANTS_AVAILABLE_FOR_DEPT: &str = r#"
    SELECT workflow_key, request_type, name, category, scope_kind, scope_value, enabled, is_default, created_at
    FROM workflow_variants
    WHERE enabled = 1 AND (scope_kind = 'global' OR (scope_kind = 'dept' AND scope_value = ?))
    ORDER BY category ASC, name ASC
"#;

pub const VARIANTS_AVAILABLE_GLOBAL: &str = r#"
    SELECT workflow_key, request_type, name, category, scope_kind, scope_value, enabled, is_default, created_at
    FROM workflow_variants
    WHERE enabled = 1 AND scope_kind = 'global'
    ORDER BY category ASC, name ASC
"#;

pub const VARIANTS_LIST_ALL: &str = r#"
    SELECT workflow_key, request_type, name, category, scope_kind, scope_value, enabled, is_default, created_at
    FROM workflow_variants
    ORDER BY category ASC, name ASC
"#;

pub const VARIANT_UPSERT: &str = r#"
    INSERT INTO workflow_variants
      (workflow_key, request_type, name, category, scope_kind, scope_value, enabled, is_default, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(workflow_key) DO UPDATE SET
      request_type = excluded.request_type,
      name = excluded.name,
      category = excluded.category,
      scope_kind = excluded.scope_kind,
      scope_value = excluded.scope_value,
      enabled = excluded.enabled,
      is_default = excluded.is_default
"#;

/// Defaulting is exclusive per (request_type, dept scope value).
pub const VARIANT_CLEAR_DEFAULT_DEPT: &str = r#"
    UPDATE workflow_variants
    SET is_default = 0
    WHERE request_type = ? AND scope_kind = 'dept' AND scope_value = ? AND workflow_key <> ?
"#;

/// Defaulting is exclusive per request_type in the global scope.
pub const VARIANT_CLEAR_DEFAULT_GLOBAL: &str = r#"
    UPDATE workflow_variants
    SET is_default = 0
    WHERE request_type = ? AND scope_kind = 'global' AND workflow_key <> ?
"#;

pub const VARIANT_DELETE: &str = r#"
    DELETE FROM workflow_variants WHERE workflow_key = ?
"#;

pub const VARIANT_DEFAULT_FOR_DEPT: &str = r#"
    SELECT workflow_key FROM workflow_variants
    WHERE request_type = ? AND enabled = 1 AND is_default = 1 AND scope_kind = 'dept' AND scope_value = ?
    LIMIT 1
"#;

pub const VARIANT_DEFAULT_GLOBAL: &str = r#"
    SELECT workflow_key FROM workflow_variants
    WHERE request_type = ? AND enabled = 1 AND is_default = 1 AND scope_kind = 'global'
    LIMIT 1
"#;

pub const VARIANT_COUNT: &str = "SELECT COUNT(1) FROM workflow_variants";

pub const STEPS_FOR_KEY: &str = r#"
    SELECT workflow_key, step_order, step_key, assignee_kind, assignee_value, condition_kind, condition_value
    FROM workflow_variant_steps
    WHERE workflow_key = ?
    ORDER BY step_order ASC
"#;

pub const STEPS_DELETE_FOR_KEY: &str = r#"
    DELETE FROM workflow_variant_steps WHERE workflow_key = ?
"#;

pub const STEP_INSERT: &str = r#"
    INSERT INTO workflow_variant_steps
      (workflow_key, step_order, step_key, assignee_kind, assignee_value, condition_kind, condition_value, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const STEPS_EXIST_FOR_KEY: &str = r#"
    SELECT 1 FROM workflow_variant_steps WHERE workflow_key = ? LIMIT 1
"#;
