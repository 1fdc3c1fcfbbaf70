use serde::{Deserialize, Serialize};

/// Key the signed-in user is stored under.
pub const USER_KEY: &str = "defensis_user";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Developer,
    Team,
    Enterprise,
    Custom,
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Developer => write!(f, "developer"),
            Self::Team => write!(f, "team"),
            Self::Enterprise => write!(f, "enterprise"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "developer" => Ok(Self::Developer),
            "team" => Ok(Self::Team),
            "enterprise" => Ok(Self::Enterprise),
            "custom" => Ok(Self::Custom),
            other => Err(format!("Unknown plan: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub plan: Plan,
}

/// Partial update merged into an existing [`UserRecord`].
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub plan: Option<Plan>,
}

impl UserRecord {
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(plan) = patch.plan {
            self.plan = plan;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_json_shape() {
        let user = UserRecord {
            id: "1".to_string(),
            email: "dev@example.com".to_string(),
            name: "dev".to_string(),
            avatar: None,
            plan: Plan::Free,
        };
        let json: serde_json::Value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "1", "email": "dev@example.com", "name": "dev", "plan": "free"})
        );
    }

    #[test]
    fn test_plan_from_str() {
        assert_eq!("Team".parse::<Plan>().unwrap(), Plan::Team);
        assert!("platinum".parse::<Plan>().is_err());
    }

    #[test]
    fn test_apply_patch_keeps_unset_fields() {
        let mut user = UserRecord {
            id: "1".to_string(),
            email: "dev@example.com".to_string(),
            name: "dev".to_string(),
            avatar: None,
            plan: Plan::Free,
        };
        user.apply(UserPatch { plan: Some(Plan::Developer), ..Default::default() });
        assert_eq!(user.plan, Plan::Developer);
        assert_eq!(user.name, "dev");
    }
}
