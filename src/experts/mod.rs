pub mod article;
pub mod catalog;
pub mod comprehensive;
pub mod profile;
pub mod specialty;

pub use article::{generate_expert_article, ExpertArticle, ExpertInfo};
pub use catalog::ExpertCatalog;
pub use comprehensive::{generate_comprehensive_analysis, ComprehensiveAnalysis};
pub use profile::{ExpertProfile, ExpertiseArea, WritingStyle};
