//! Command line parsing and execution.
//!
//! Commands:
//! - `server-info` - Product and REST API version (no sign-in)
//! - `sites` - Every site on the server
//! - `projects` - Every project on the signed-in site
//! - `datasources [--name N]` - Datasources, optionally filtered by name
//! - `datasource-xml --project-id ID --name N` - Download a datasource definition

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use tabrest_client::config::{DEFAULT_API_VERSION, DEFAULT_SITE_NAME};
use tabrest_client::{ClientConfig, ClientIdentity, TableauClient};

use crate::env;

/// tabrest - query a Tableau Server over its REST API
#[derive(Parser, Debug)]
#[command(name = "tabrest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server base URL, e.g. https://tableau.example.com
    #[arg(long, env = "TABREST_SERVER")]
    pub server: String,

    /// REST API version
    #[arg(long, default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Site content URL to sign in to
    #[arg(long, default_value = DEFAULT_SITE_NAME)]
    pub site: String,

    #[arg(long, env = "TABREST_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "TABREST_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Sign in to the default site with an empty site name
    #[arg(long)]
    pub omit_default_site_name: bool,

    /// Trace every request and response
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ServerInfo,
    Sites,
    Projects,
    Datasources {
        /// Only datasources with exactly this name
        #[arg(long)]
        name: Option<String>,
    },
    DatasourceXml {
        #[arg(long)]
        project_id: String,

        #[arg(long)]
        name: String,
    },
}

impl Command {
    fn needs_session(&self) -> bool {
        !matches!(self, Command::ServerInfo)
    }
}

impl Cli {
    pub fn client_config(&self, identity: Option<ClientIdentity>) -> ClientConfig {
        let config = ClientConfig::new(&self.server)
            .with_api_version(&self.api_version)
            .with_debug(self.debug)
            .with_omit_default_site_name(self.omit_default_site_name);

        match identity {
            Some(identity) => config.with_identity(identity),
            None => config,
        }
    }
}

/// Run `cli` against a freshly built client, writing to stdout.
pub fn run(cli: Cli) -> Result<()> {
    let config = cli.client_config(env::identity_from_env());
    let client = TableauClient::new(config).context("could not build HTTP client")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with(client, &cli, &mut out)
}

/// Sign in if the command needs a session, run it, then sign out.
///
/// A failed sign-out is logged; the command's own result is returned.
pub fn run_with(mut client: TableauClient, cli: &Cli, out: &mut dyn Write) -> Result<()> {
    if !cli.command.needs_session() {
        return execute(&client, "", &cli.command, out);
    }

    let username = cli
        .username
        .as_deref()
        .context("no username given (--username or TABREST_USERNAME)")?;
    let password = cli
        .password
        .as_deref()
        .context("no password given (--password or TABREST_PASSWORD)")?;

    let credentials = client
        .sign_in(username, password, &cli.site, None)
        .with_context(|| format!("sign in to site '{}' failed", cli.site))?;
    let site_id = credentials.site.map(|site| site.id).unwrap_or_default();
    tracing::info!(site = %cli.site, site_id = %site_id, "signed in");

    let result = execute(&client, &site_id, &cli.command, out);

    if let Err(e) = client.sign_out() {
        tracing::warn!(error = %e, "sign out failed");
    }

    result
}

/// Execute one command on an already signed-in client.
pub fn execute(
    client: &TableauClient,
    site_id: &str,
    command: &Command,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::ServerInfo => {
            let info = client.server_info()?;
            writeln!(
                out,
                "product {} (build {})",
                info.product_version.version, info.product_version.build
            )?;
            writeln!(out, "rest api {}", info.rest_api_version)?;
        }
        Command::Sites => {
            for site in client.query_sites()? {
                writeln!(out, "{}\t{}\t{}", site.id, site.name, site.content_url)?;
            }
        }
        Command::Projects => {
            for project in client.query_projects(site_id)? {
                writeln!(out, "{}\t{}", project.id, project.name)?;
            }
        }
        Command::Datasources { name } => {
            for datasource in client.query_datasources(site_id, name.as_deref())? {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    datasource.id,
                    datasource.name,
                    datasource.project_id(),
                    datasource.kind.as_deref().unwrap_or("")
                )?;
            }
        }
        Command::DatasourceXml { project_id, name } => {
            match client.get_datasource_content_xml(site_id, project_id, name)? {
                Some(xml) => writeln!(out, "{}", xml)?,
                None => bail!("no datasource named '{}' in project {}", name, project_id),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use tabrest_client::{Error, HttpExecutor, HttpRequest, HttpResponse};

    const SERVER: &str = "https://tab.example.com";

    const SIGNIN_OK: &str = r#"<tsResponse><credentials token="tok"><site id="site-1" contentUrl=""/><user id="user-1"/></credentials></tsResponse>"#;

    /// Answers by exact URL, 404 otherwise, and remembers what it was asked.
    struct CannedExecutor {
        responses: HashMap<String, (u16, String)>,
        seen: Mutex<Vec<String>>,
    }

    impl CannedExecutor {
        fn new(responses: &[(&str, u16, &str)]) -> Self {
            Self {
                responses: responses
                    .iter()
                    .map(|(path, status, body)| {
                        (
                            format!("{}/api/2.0/{}", SERVER, path),
                            (*status, body.to_string()),
                        )
                    })
                    .collect(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl HttpExecutor for CannedExecutor {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
            self.seen.lock().unwrap().push(request.url.clone());
            Ok(match self.responses.get(&request.url) {
                Some((status, body)) => HttpResponse::new(*status, body.clone()),
                None => HttpResponse::new(404, ""),
            })
        }
    }

    struct Shared(Arc<CannedExecutor>);

    impl HttpExecutor for Shared {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
            self.0.execute(request)
        }
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["tabrest", "--server", SERVER, "--username", "admin", "--password", "pw"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn output(executor: &Arc<CannedExecutor>, cli: &Cli) -> Result<String> {
        let client = TableauClient::with_executor(
            ClientConfig::new(SERVER),
            Box::new(Shared(Arc::clone(executor))),
        );
        let mut out = Vec::new();
        run_with(client, cli, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_defaults() {
        let cli = cli(&["projects"]);
        assert_eq!(cli.api_version, "2.0");
        assert_eq!(cli.site, "Default");
        assert!(!cli.omit_default_site_name);
        assert_eq!(cli.command, Command::Projects);
    }

    #[test]
    fn test_parse_datasource_xml() {
        let cli = cli(&["--site", "Finance", "datasource-xml", "--project-id", "p1", "--name", "Sales"]);
        assert_eq!(cli.site, "Finance");
        assert_eq!(
            cli.command,
            Command::DatasourceXml {
                project_id: "p1".to_string(),
                name: "Sales".to_string(),
            }
        );
    }

    #[test]
    fn test_client_config_carries_flags() {
        let cli = cli(&["--api-version", "2.8", "--omit-default-site-name", "--debug", "sites"]);
        let config = cli.client_config(Some(ClientIdentity::new("c.pem", "k.pem")));

        assert_eq!(config.api_base(), format!("{}/api/2.8", SERVER));
        assert!(config.debug);
        assert!(config.omit_default_site_name);
        assert!(config.transport.identity.is_some());
    }

    #[test]
    fn test_projects_signs_in_lists_and_signs_out() {
        let executor = Arc::new(CannedExecutor::new(&[
            ("auth/signin", 200, SIGNIN_OK),
            (
                "sites/site-1/projects?pageSize=100&pageNumber=1",
                200,
                r#"<tsResponse><pagination pageNumber="1" pageSize="100" totalAvailable="2"/><projects><project id="p1" name="One"/><project id="p2" name="Two"/></projects></tsResponse>"#,
            ),
            ("auth/signout", 204, ""),
        ]));

        let text = output(&executor, &cli(&["projects"])).unwrap();
        assert_eq!(text, "p1\tOne\np2\tTwo\n");

        let seen = executor.seen.lock().unwrap();
        assert!(seen.first().unwrap().ends_with("auth/signin"));
        assert!(seen.last().unwrap().ends_with("auth/signout"));
    }

    #[test]
    fn test_missing_datasource_is_an_error() {
        let executor = Arc::new(CannedExecutor::new(&[
            ("auth/signin", 200, SIGNIN_OK),
            (
                "sites/site-1/datasources?pageSize=1000&filter=name:eq:Sales",
                200,
                "<tsResponse><datasources/></tsResponse>",
            ),
            ("auth/signout", 204, ""),
        ]));

        let err = output(
            &executor,
            &cli(&["datasource-xml", "--project-id", "p1", "--name", "Sales"]),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "no datasource named 'Sales' in project p1");
        assert!(executor.seen.lock().unwrap().last().unwrap().ends_with("auth/signout"));
    }

    #[test]
    fn test_failed_sign_in_has_context() {
        let executor = Arc::new(CannedExecutor::new(&[(
            "auth/signin",
            401,
            r#"<tsResponse><error code="401001"><summary>Signin Error</summary><detail>Bad credentials</detail></error></tsResponse>"#,
        )]));

        let err = output(&executor, &cli(&["sites"])).unwrap_err();
        assert_eq!(err.to_string(), "sign in to site 'Default' failed");
        let cause = err.downcast_ref::<Error>().unwrap();
        assert_eq!(cause.server_error().unwrap().code, "401001");
    }
}
