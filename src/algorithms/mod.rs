pub mod classifier;
pub mod sampler;
pub mod vectorizer;

pub use classifier::{Classifier, SoftmaxClassifier};
pub use vectorizer::TfidfVectorizer;
