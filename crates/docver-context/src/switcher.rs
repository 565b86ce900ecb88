//! Version/language switcher rendering using minijinja.

use minijinja::Environment;

use crate::context::NavigationContext;

const SWITCHER_NAME: &str = "versions.html";

/// Renders the switcher fragment from a navigation context.
pub struct SwitcherRenderer {
    env: Environment<'static>,
}

impl SwitcherRenderer {
    /// Create a renderer with the default switcher template.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned(SWITCHER_NAME.to_string(), SWITCHER_TEMPLATE.to_string())
            .expect("Failed to add switcher template");

        Self { env }
    }

    /// Create a renderer from a user-supplied template.
    pub fn with_template(source: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template_owned(SWITCHER_NAME.to_string(), source.into())?;
        Ok(Self { env })
    }

    /// Render the switcher for `context`.
    pub fn render(&self, context: &NavigationContext) -> Result<String, minijinja::Error> {
        self.env.get_template(SWITCHER_NAME)?.render(context)
    }
}

impl Default for SwitcherRenderer {
    fn default() -> Self {
        Self::new()
    }
}

const SWITCHER_TEMPLATE: &str = r#"<div class="rst-versions" data-toggle="rst-versions" role="note" aria-label="versions">
  <span class="rst-current-version" data-toggle="rst-current-version">
    {{ current_language }} | {{ current_version.name }}
  </span>
  <div class="rst-other-versions">
    {%- if languages %}
    <dl>
      <dt>Languages</dt>
      {%- for lang in languages %}
      <dd>{% if lang.name == current_language %}<strong>{% endif %}<a href="{{ lang.url }}">{{ lang.name }}</a>{% if lang.name == current_language %}</strong>{% endif %}</dd>
      {%- endfor %}
    </dl>
    {%- endif %}
    {%- if versions.tags %}
    <dl>
      <dt>Versions</dt>
      {%- for tag in versions.tags %}
      <dd><a href="{{ tag.url }}">{{ tag.name }}</a></dd>
      {%- endfor %}
    </dl>
    {%- endif %}
    <dl>
      <dt>Branches</dt>
      {%- for branch in versions.branches %}
      <dd><a href="{{ branch.url }}">{{ branch.name }}</a></dd>
      {%- endfor %}
    </dl>
  </div>
</div>
"#;
