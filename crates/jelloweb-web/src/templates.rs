//! Embedded minijinja templates. `.html` templates are auto-escaped.

use minijinja::Environment;

pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("base.html", include_str!("../templates/base.html"))?;
    env.add_template("home.html", include_str!("../templates/home.html"))?;
    env.add_template("jc.html", include_str!("../templates/jc.html"))?;
    Ok(env)
}
