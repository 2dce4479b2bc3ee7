pub mod contact_sampler;
pub mod uniform_rect_sampler;
