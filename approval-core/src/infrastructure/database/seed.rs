//! Catalog seed and reconciliation.
//!
//! Installs the default workflow catalog on an empty database and brings
//! older stored catalogs up to the current shape. Every seeded variant is
//! a global, enabled default whose workflow_key equals its request type.

use sqlx::SqliteConnection;
use tracing::info;

use crate::domain::entities::AssigneeKind;
use crate::infrastructure::repositories::workflow_repository;
use crate::infrastructure::repositories::user_repository::{self, NewUser};
use crate::shared::AppResult;

type SeedStep = (
    i64,
    &'static str,
    AssigneeKind,
    Option<&'static str>,
    Option<&'static str>,
    Option<&'static str>,
);

struct SeedVariant {
    key: &'static str,
    name: &'static str,
    category: &'static str,
    steps: &'static [SeedStep],
}

use AssigneeKind::{Manager, Role, UsersAll};

const MANAGER: SeedStep = (1, "manager", Manager, None, None, None);

/// The shipped catalog. Display names are the English set; a deployment
/// can rename variants through the catalog API without touching the seed.
const CATALOG: &[SeedVariant] = &[
    SeedVariant {
        key: "generic",
        name: "Generic Request",
        category: "General",
        steps: &[(1, "admin", Role, Some("admin"), None, None)],
    },
    SeedVariant {
        key: "leave",
        name: "Leave Request",
        category: "HR/Admin",
        steps: &[MANAGER],
    },
    SeedVariant {
        key: "expense",
        name: "Expense Reimbursement",
        category: "Finance",
        steps: &[
            MANAGER,
            (2, "gm", Role, Some("admin"), Some("min_amount"), Some("5000")),
            (3, "finance", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "purchase",
        name: "Purchase Request",
        category: "Procurement",
        steps: &[
            MANAGER,
            (2, "gm", Role, Some("admin"), Some("min_amount"), Some("20000")),
            (3, "procurement", Role, Some("admin"), None, None),
            (4, "finance", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "overtime",
        name: "Overtime Request",
        category: "HR/Admin",
        steps: &[
            MANAGER,
            (2, "hr", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "attendance_correction",
        name: "Attendance Correction",
        category: "HR/Admin",
        steps: &[
            MANAGER,
            (2, "hr", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "business_trip",
        name: "Business Trip",
        category: "HR/Admin",
        steps: &[
            MANAGER,
            (2, "hr", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "outing",
        name: "Outing Request",
        category: "HR/Admin",
        steps: &[
            MANAGER,
            (2, "hr", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "travel_expense",
        name: "Travel Expense",
        category: "Finance",
        steps: &[
            MANAGER,
            (2, "finance", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "onboarding",
        name: "Onboarding",
        category: "HR/Admin",
        steps: &[
            (1, "hr", Role, Some("admin"), None, None),
            (2, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "probation",
        name: "Probation Review",
        category: "HR/Admin",
        steps: &[
            MANAGER,
            (2, "hr", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "resignation",
        name: "Resignation",
        category: "HR/Admin",
        steps: &[
            MANAGER,
            (2, "hr", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "job_transfer",
        name: "Job Transfer",
        category: "HR/Admin",
        steps: &[
            MANAGER,
            (2, "hr", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "salary_adjustment",
        name: "Salary Adjustment",
        category: "HR/Admin",
        steps: &[
            MANAGER,
            (2, "hr", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "loan",
        name: "Loan Request",
        category: "Finance",
        steps: &[
            MANAGER,
            (2, "finance", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "payment",
        name: "Payment Request",
        category: "Finance",
        steps: &[
            MANAGER,
            (2, "finance", Role, Some("admin"), None, None),
            (3, "gm", Role, Some("admin"), None, None),
            (4, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "budget",
        name: "Budget Reservation",
        category: "Finance",
        steps: &[
            MANAGER,
            (2, "finance", Role, Some("admin"), None, None),
            (3, "gm", Role, Some("admin"), None, None),
            (4, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "invoice",
        name: "Invoice Request",
        category: "Finance",
        steps: &[
            MANAGER,
            (2, "finance", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "fixed_asset_accounting",
        name: "Fixed Asset Accounting",
        category: "Finance",
        steps: &[
            MANAGER,
            (2, "finance", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "purchase_plus",
        name: "Purchase (Extended)",
        category: "Procurement",
        steps: &[
            MANAGER,
            (2, "procurement", Role, Some("admin"), None, None),
            (3, "gm", Role, Some("admin"), None, None),
            (4, "finance", Role, Some("admin"), None, None),
            (5, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "quote_compare",
        name: "Quote Comparison",
        category: "Procurement",
        steps: &[
            MANAGER,
            (2, "procurement", Role, Some("admin"), None, None),
            (3, "finance", Role, Some("admin"), None, None),
            (4, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "acceptance",
        name: "Acceptance",
        category: "Procurement",
        steps: &[
            MANAGER,
            (2, "procurement", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "inventory_in",
        name: "Inventory In",
        category: "Procurement",
        steps: &[
            MANAGER,
            (2, "procurement", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "inventory_out",
        name: "Inventory Out",
        category: "Procurement",
        steps: &[
            MANAGER,
            (2, "procurement", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "device_claim",
        name: "Device Claim",
        category: "Assets",
        steps: &[MANAGER, (2, "admin", Role, Some("admin"), None, None)],
    },
    SeedVariant {
        key: "asset_transfer",
        name: "Asset Transfer",
        category: "Assets",
        steps: &[MANAGER, (2, "admin", Role, Some("admin"), None, None)],
    },
    SeedVariant {
        key: "asset_maintenance",
        name: "Asset Maintenance",
        category: "Assets",
        steps: &[MANAGER, (2, "admin", Role, Some("admin"), None, None)],
    },
    SeedVariant {
        key: "asset_scrap",
        name: "Asset Scrap",
        category: "Assets",
        steps: &[
            MANAGER,
            (2, "finance", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "contract",
        name: "Contract Approval",
        category: "Contract/Legal",
        steps: &[
            MANAGER,
            (2, "legal", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "legal_review",
        name: "Legal Review",
        category: "Contract/Legal",
        steps: &[
            (1, "legal", Role, Some("admin"), None, None),
            (2, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "seal",
        name: "Seal Application",
        category: "Contract/Legal",
        steps: &[
            (1, "legal", Role, Some("admin"), None, None),
            (2, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "archive",
        name: "Archive",
        category: "Contract/Legal",
        steps: &[(1, "admin", Role, Some("admin"), None, None)],
    },
    SeedVariant {
        key: "account_open",
        name: "Account Open",
        category: "IT",
        steps: &[
            MANAGER,
            (2, "it", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "permission",
        name: "Access Request",
        category: "IT",
        steps: &[
            MANAGER,
            (2, "it", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "vpn_email",
        name: "VPN/Email Open",
        category: "IT",
        steps: &[
            (1, "it", Role, Some("admin"), None, None),
            (2, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "it_device",
        name: "IT Device Request",
        category: "IT",
        steps: &[
            MANAGER,
            (2, "it", Role, Some("admin"), None, None),
            (3, "admin", Role, Some("admin"), None, None),
        ],
    },
    SeedVariant {
        key: "meeting_room",
        name: "Meeting Room Booking",
        category: "Logistics",
        steps: &[(1, "admin", Role, Some("admin"), None, None)],
    },
    SeedVariant {
        key: "car",
        name: "Car Request",
        category: "Logistics",
        steps: &[MANAGER, (2, "admin", Role, Some("admin"), None, None)],
    },
    SeedVariant {
        key: "supplies",
        name: "Supplies Request",
        category: "Logistics",
        steps: &[MANAGER, (2, "admin", Role, Some("admin"), None, None)],
    },
    SeedVariant {
        key: "policy_announcement",
        name: "Policy Announcement",
        category: "Policy/Compliance",
        steps: &[(1, "admin", Role, Some("admin"), None, None)],
    },
    SeedVariant {
        key: "read_ack",
        name: "Read Acknowledgement",
        category: "Policy/Compliance",
        steps: &[(1, "ack", UsersAll, Some("all"), None, None)],
    },
];

async fn install_variant(conn: &mut SqliteConnection, seed: &SeedVariant) -> AppResult<()> {
    let variant = crate::domain::entities::WorkflowVariant {
        workflow_key: seed.key.to_string(),
        request_type: seed.key.to_string(),
        name: seed.name.to_string(),
        category: seed.category.to_string(),
        scope_kind: crate::domain::entities::ScopeKind::Global,
        scope_value: None,
        enabled: true,
        is_default: true,
        created_at: chrono::Utc::now(),
    };
    workflow_repository::upsert_variant(conn, &variant).await
}

async fn install_steps(conn: &mut SqliteConnection, seed: &SeedVariant) -> AppResult<()> {
    let steps: Vec<crate::domain::entities::NewWorkflowStep> = seed
        .steps
        .iter()
        .map(
            |&(order, key, kind, value, cond_kind, cond_value)| crate::domain::entities::NewWorkflowStep {
                step_order: order,
                step_key: key.to_string(),
                assignee_kind: kind,
                assignee_value: value.map(str::to_string),
                condition_kind: cond_kind.map(str::to_string),
                condition_value: cond_value.map(str::to_string),
            },
        )
        .collect();
    workflow_repository::replace_steps(conn, seed.key, &steps).await
}

/// Install the full catalog when the table is empty. Idempotent.
pub async fn ensure_workflow_catalog(conn: &mut SqliteConnection) -> AppResult<()> {
    if workflow_repository::variant_count(&mut *conn).await? > 0 {
        return Ok(());
    }
    info!(variants = CATALOG.len(), "seeding workflow catalog");
    for seed in CATALOG {
        install_variant(&mut *conn, seed).await?;
        install_steps(&mut *conn, seed).await?;
    }
    Ok(())
}

/// Bring an older stored catalog up to the current shape without touching
/// operator edits: missing variants are added, existing ones are left
/// alone, and the pre-threshold expense route gains its `gm` gate.
pub async fn reconcile_workflow_catalog(conn: &mut SqliteConnection) -> AppResult<()> {
    reconcile_expense_gm_step(&mut *conn).await?;

    for seed in CATALOG {
        if workflow_repository::get_variant(&mut *conn, seed.key).await?.is_none() {
            install_variant(&mut *conn, seed).await?;
        }
        if !workflow_repository::steps_exist(&mut *conn, seed.key).await? {
            install_steps(&mut *conn, seed).await?;
        }
    }
    Ok(())
}

/// Catalogs written before the threshold gate existed stored expense as
/// plain manager -> finance. Splice the gm step in at order 2.
async fn reconcile_expense_gm_step(conn: &mut SqliteConnection) -> AppResult<()> {
    let steps = workflow_repository::list_steps(&mut *conn, "expense").await?;
    if steps.is_empty() {
        return Ok(());
    }
    let keys: Vec<&str> = steps.iter().map(|s| s.step_key.as_str()).collect();
    if keys != ["manager", "finance"] {
        return Ok(());
    }
    info!("reconciling expense workflow: inserting gm threshold step");
    sqlx::query(
        "UPDATE workflow_variant_steps SET step_order = 3 \
         WHERE workflow_key = 'expense' AND step_order = 2 AND step_key = 'finance'",
    )
    .execute(&mut *conn)
    .await?;
    sqlx::query(
        "INSERT INTO workflow_variant_steps \
           (workflow_key, step_order, step_key, assignee_kind, assignee_value, condition_kind, condition_value, created_at) \
         VALUES ('expense', 2, 'gm', 'role', 'admin', 'min_amount', '5000', ?)",
    )
    .bind(chrono::Utc::now())
    .execute(conn)
    .await?;
    Ok(())
}

/// First-run accounts: an `admin` and a managed `user`.
pub async fn ensure_default_accounts(conn: &mut SqliteConnection) -> AppResult<()> {
    if user_repository::count_users(&mut *conn).await? > 0 {
        return Ok(());
    }
    let admin_id = user_repository::create_user(
        &mut *conn,
        NewUser {
            username: "admin",
            role: "admin",
            dept: None,
            manager_id: None,
            dept_id: None,
            position: None,
        },
    )
    .await?;
    user_repository::create_user(
        conn,
        NewUser {
            username: "user",
            role: "user",
            dept: None,
            manager_id: Some(admin_id),
            dept_id: None,
            position: None,
        },
    )
    .await?;
    info!("created default admin and user accounts");
    Ok(())
}
