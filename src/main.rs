//! Renders a demonstration login page from an urlencoded body read on stdin
//!
//! Usage: `echo 'username=john&favFood=bugs' | hmc-render [json|xml]`
use hmc_rs::{
    Config, Extract, Form, Format, FormValues, HmcError, Input, Link, Map, Renderer, Select,
    SelectOption, Submit, ToXml, XmlWriter,
    xml::Element,
};
use serde::Serialize;
use std::io::{Read, Write};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::new()?;
    let format = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<Format>()?,
        None => Format::Json,
    };

    let mut body = Vec::new();
    std::io::stdin().read_to_end(&mut body)?;
    let mut form = FormValues::parse_bytes(&body);
    info!("Decoded {} form key(s)", form.len());

    let mut page = LoginPage::new();
    page.form.elements.extract_values(&mut form);
    page.form.elements.validate();
    if !form.is_empty() {
        warn!("{} form key(s) left unclaimed", form.len());
    }

    let renderer = Renderer::new(&config);
    let out = renderer.render(format, "LoginPage", &page)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(out.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

#[derive(Serialize)]
struct LoginPage {
    title: String,
    form: Form<Login>,
}

#[derive(Serialize)]
struct Login {
    username: Input,
    password: Input,
    favourite_food: Select,
    misc: Map,
    register: Link,
    submit: Submit,
}

impl LoginPage {
    fn new() -> Self {
        let mut favourite_food = Select::new(
            "favFood",
            ["fruit", "vegetables", "meat", "fish"]
                .into_iter()
                .map(SelectOption::new)
                .collect(),
        );
        favourite_food.label = "Favourite food".to_string();
        favourite_food
            .options
            .push(SelectOption::labelled("Bugs", "bugs"));

        Self {
            title: "Login to my thing".to_string(),
            form: Form::new(
                "POST",
                Login {
                    username: Input {
                        label: "Username".to_string(),
                        required: true,
                        max_length: 64,
                        ..Input::new("username")
                    },
                    password: Input {
                        label: "Password".to_string(),
                        kind: "password".to_string(),
                        required: true,
                        min_length: 8,
                        ..Input::new("password")
                    },
                    favourite_food,
                    misc: Map {
                        label: "Any other arbitrary information you wanna provide?".to_string(),
                        max_entries: 16,
                        ..Map::new("misc")
                    },
                    register: Link::new("Register", "/register"),
                    submit: Submit::new("Log in"),
                },
            ),
        }
    }
}

impl Login {
    #[instrument(level = "debug", skip_all)]
    fn extract_values(&mut self, form: &mut FormValues) {
        self.username.extract(form);
        self.password.extract(form);
        self.favourite_food.extract(form);
        self.misc.extract(form);
    }

    fn validate(&mut self) {
        let failures = [
            self.username.validate(),
            self.password.validate(),
            self.favourite_food.validate(),
            self.misc.validate(),
        ];
        debug!(
            "{} control(s) failed validation",
            failures.iter().flatten().count()
        );
    }
}

impl ToXml for LoginPage {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        w.text_element(Element::new("Title"), &self.title)?;
        w.write(&self.form)
    }
}

impl ToXml for Login {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        w.write(&self.username)?;
        w.write(&self.password)?;
        w.write(&self.favourite_food)?;
        w.write(&self.misc)?;
        w.write(&self.register)?;
        w.write(&self.submit)
    }
}
