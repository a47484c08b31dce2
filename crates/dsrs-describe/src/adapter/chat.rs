use tracing::trace;

use super::Adapter;
use crate::{DescribeOptions, Signature, build_description_string, describe_options};

/// Formats the field-description section of a chat system prompt.
///
/// Stateless: the depth limit comes from [`configure`](crate::configure)d settings
/// unless passed explicitly via
/// [`format_field_description_with`](ChatAdapter::format_field_description_with).
#[derive(Debug, Default, Clone, Copy)]
pub struct ChatAdapter;

impl ChatAdapter {
    #[tracing::instrument(
        name = "dsrs.adapter.chat.format_field_description",
        level = "trace",
        skip(self, signature),
        fields(
            inputs = signature.input_fields().len(),
            outputs = signature.output_fields().len(),
            max_depth = options.max_depth
        )
    )]
    pub fn format_field_description_with(
        &self,
        signature: &Signature,
        options: &DescribeOptions,
    ) -> String {
        let registry = signature.registry();
        let inputs = build_description_string(signature.input_fields(), registry, options);
        let outputs = build_description_string(signature.output_fields(), registry, options);

        let description =
            format!("Your input fields are:\n{inputs}\n\nYour output fields are:\n{outputs}");
        trace!(description_len = description.len(), "formatted field description");
        description
    }
}

impl Adapter for ChatAdapter {
    fn format_field_description(&self, signature: &Signature) -> String {
        self.format_field_description_with(signature, &describe_options())
    }
}
