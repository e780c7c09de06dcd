//! Data models for database seeding configuration.

use uuid::Uuid;

/// Description stored on every seeded material; `clear-seed` keys on it.
pub const SEED_MATERIAL_MARKER: &str = "Seeded material";
/// Phone prefix of seeded students.
pub const SEED_PHONE_PREFIX: &str = "0700";
/// Name prefix of seeded codes groups.
pub const SEED_GROUP_PREFIX: &str = "Seed batch";

pub struct MaterialSeed {
    pub id: Uuid,
    pub name: String,
    pub sections: Vec<SectionSeed>,
    pub files: Vec<FileSeed>,
}

pub struct SectionSeed {
    pub id: Uuid,
    pub name: String,
    pub videos: Vec<VideoSeed>,
    pub question_groups: Vec<QuestionGroupSeed>,
}

pub struct VideoSeed {
    pub name: String,
    pub source: serde_json::Value,
    pub is_free: bool,
    pub order_index: i32,
}

pub struct QuestionGroupSeed {
    pub paragraph: Option<String>,
    pub questions: serde_json::Value,
}

pub struct FileSeed {
    pub num: i32,
    pub kind: &'static str,
    pub filename: String,
    pub access_url: String,
}

pub struct StudentSeed {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Shape of the seeded catalog.
#[derive(Clone)]
pub struct CatalogShape {
    pub sections_per_material: usize,
    pub videos_per_section: usize,
    pub question_groups_per_section: usize,
    pub files_per_material: usize,
}

impl Default for CatalogShape {
    fn default() -> Self {
        Self {
            sections_per_material: 4,
            videos_per_section: 6,
            question_groups_per_section: 10,
            files_per_material: 3,
        }
    }
}

/// Complete configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    pub num_materials: usize,
    pub catalog: CatalogShape,
    pub num_students: usize,
    pub codes_per_material: usize,
    pub code_validity_days: i64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_materials: 3,
            catalog: CatalogShape::default(),
            num_students: 50,
            codes_per_material: 20,
            code_validity_days: 30,
        }
    }
}

impl SeedConfig {
    /// Creates a new seed configuration with the specified number of materials.
    pub fn new(num_materials: usize) -> Self {
        Self {
            num_materials,
            ..Default::default()
        }
    }

    pub fn with_catalog(mut self, catalog: CatalogShape) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_students(mut self, num_students: usize) -> Self {
        self.num_students = num_students;
        self
    }

    pub fn with_codes(mut self, codes_per_material: usize, validity_days: i64) -> Self {
        self.codes_per_material = codes_per_material;
        self.code_validity_days = validity_days;
        self
    }

    pub fn total_videos(&self) -> usize {
        self.num_materials * self.catalog.sections_per_material * self.catalog.videos_per_section
    }
}
