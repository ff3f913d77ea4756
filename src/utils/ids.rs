use uuid::Uuid;

/// A random v4 UUID in its hyphenated form.
pub fn get_uuid() -> String {
    uuid_string(&Uuid::new_v4())
}

/// A random v4 UUID without hyphens.
pub fn generate_guid() -> String {
    guid_string(&Uuid::new_v4())
}

pub fn uuid_string(id: &Uuid) -> String {
    id.hyphenated().to_string()
}

pub fn guid_string(id: &Uuid) -> String {
    id.simple().to_string()
}
