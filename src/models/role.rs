use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Capacités CRUD sur une ressource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

impl Capabilities {
    pub const fn all() -> Self {
        Self { create: true, read: true, update: true, delete: true }
    }

    pub const fn read_only() -> Self {
        Self { create: false, read: true, update: false, delete: false }
    }

    pub const fn none() -> Self {
        Self { create: false, read: false, update: false, delete: false }
    }
}

/// Ressources connues du système. Ensemble fermé : une ressource absente
/// d'ici n'existe pas pour le moteur d'autorisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Users,
    Contacts,
    Companies,
    Statuses,
    Roles,
    Notes,
    Reminders,
    Tenant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// Matrice de permissions d'un rôle : un champ par ressource, figé à la
/// compilation (pas de structure libre — une faute de frappe ne passe pas).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMatrix {
    pub users: Capabilities,
    pub contacts: Capabilities,
    pub companies: Capabilities,
    pub statuses: Capabilities,
    pub roles: Capabilities,
    pub notes: Capabilities,
    pub reminders: Capabilities,
    pub tenant: Capabilities,
}

impl PermissionMatrix {
    /// Rôle "Admin" par défaut : tout, sauf créer ou supprimer des tenants.
    pub fn admin_defaults() -> Self {
        Self {
            users: Capabilities::all(),
            contacts: Capabilities::all(),
            companies: Capabilities::all(),
            statuses: Capabilities::all(),
            roles: Capabilities::all(),
            notes: Capabilities::all(),
            reminders: Capabilities::all(),
            tenant: Capabilities { create: false, read: true, update: true, delete: false },
        }
    }

    /// Rôle "User" par défaut : lecture seule sur les utilisateurs et
    /// statuts, aucun accès aux rôles, CRUD sans suppression sur contacts
    /// et compagnies, CRUD complet sur notes et rappels.
    pub fn user_defaults() -> Self {
        Self {
            users: Capabilities::read_only(),
            contacts: Capabilities { create: true, read: true, update: true, delete: false },
            companies: Capabilities { create: true, read: true, update: true, delete: false },
            statuses: Capabilities::read_only(),
            roles: Capabilities::none(),
            notes: Capabilities::all(),
            reminders: Capabilities::all(),
            tenant: Capabilities::read_only(),
        }
    }

    pub fn resource(&self, resource: Resource) -> &Capabilities {
        match resource {
            Resource::Users => &self.users,
            Resource::Contacts => &self.contacts,
            Resource::Companies => &self.companies,
            Resource::Statuses => &self.statuses,
            Resource::Roles => &self.roles,
            Resource::Notes => &self.notes,
            Resource::Reminders => &self.reminders,
            Resource::Tenant => &self.tenant,
        }
    }

    /// Décision d'autorisation consommée par les handlers CRUD en aval.
    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        let caps = self.resource(resource);
        match action {
            Action::Create => caps.create,
            Action::Read => caps.read,
            Action::Update => caps.update,
            Action::Delete => caps.delete,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub tenant_id: Uuid,
    pub permissions: sqlx::types::Json<PermissionMatrix>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_defaults_cannot_manage_tenant_lifecycle() {
        let m = PermissionMatrix::admin_defaults();
        // Un tenant ne peut pas en engendrer ou en détruire un autre
        assert!(!m.allows(Resource::Tenant, Action::Create));
        assert!(!m.allows(Resource::Tenant, Action::Delete));
        assert!(m.allows(Resource::Tenant, Action::Read));
        assert!(m.allows(Resource::Tenant, Action::Update));
        assert!(m.allows(Resource::Roles, Action::Delete));
        assert!(m.allows(Resource::Users, Action::Create));
    }

    #[test]
    fn test_user_defaults_are_least_privilege() {
        let m = PermissionMatrix::user_defaults();
        assert!(m.allows(Resource::Users, Action::Read));
        assert!(!m.allows(Resource::Users, Action::Create));
        // Aucun accès aux rôles
        assert!(!m.allows(Resource::Roles, Action::Read));
        // Contacts et compagnies : pas de suppression
        assert!(m.allows(Resource::Contacts, Action::Create));
        assert!(!m.allows(Resource::Contacts, Action::Delete));
        assert!(!m.allows(Resource::Companies, Action::Delete));
        // Notes et rappels : CRUD complet
        assert!(m.allows(Resource::Notes, Action::Delete));
        assert!(m.allows(Resource::Reminders, Action::Create));
        assert!(!m.allows(Resource::Tenant, Action::Update));
    }

    #[test]
    fn test_matrix_json_round_trip() {
        let m = PermissionMatrix::admin_defaults();
        let json = serde_json::to_value(&m).unwrap();
        // Forme attendue en base : {"users":{"create":true,...},...}
        assert_eq!(json["tenant"]["create"], serde_json::json!(false));
        assert_eq!(json["users"]["delete"], serde_json::json!(true));
        let back: PermissionMatrix = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }
}
