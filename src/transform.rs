mod project;

pub use self::project::ProjectIdTransformer;

use crate::resource::Resource;

pub trait Transformer {
    fn transform(&mut self, resources: &mut [Resource]) -> anyhow::Result<()>;
}
