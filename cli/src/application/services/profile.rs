//! Application service: profile builder.
//!
//! Turns validated answers into the ordered plan of shell steps. Building
//! is pure data construction: nothing here touches the network or the
//! filesystem.

use anyhow::Result;

use crate::domain::artifact::{client_config_path, companion_path};
use crate::domain::profile::PANEL_PORT;
use crate::domain::{
    Answers, CertificateRequest, InputError, Phase, Plan, PortRule, ProvisionConfig, SetupProfile,
    ShellCommand, Step, firewall_rules,
};

/// Packages every profile installs first.
const PREREQUISITES: &str = "curl socat make";

/// Docker apt repository signing key.
const DOCKER_GPG_URL: &str = "https://download.docker.com/linux/ubuntu/gpg";
const DOCKER_KEYRING: &str = "/etc/apt/keyrings/docker.gpg";

/// Download location of the x-ui installer.
const PANEL_INSTALLER: &str = "/tmp/x-ui-install.sh";

/// Options that change the plan without being operator answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Open this extra port so the artifact server is reachable.
    pub serve_port: Option<u16>,
}

/// Build the plan for `answers.profile`.
///
/// # Errors
///
/// Returns [`InputError::Missing`] if the profile issues a certificate but
/// `answers.certificate` is absent.
pub fn build_plan(answers: &Answers, config: &ProvisionConfig, opts: PlanOptions) -> Result<Plan> {
    let builder = Builder { config };
    let mut phases = Vec::new();
    // Only client configs are ever served.
    let serve_port = opts
        .serve_port
        .filter(|_| answers.profile.creates_clients());

    match answers.profile {
        SetupProfile::OpenVpn => {
            phases.push(builder.prerequisites());
            phases.push(builder.docker_install());
            phases.push(builder.firewall(answers.profile, serve_port));
            phases.push(builder.openvpn_stack());
            phases.push(builder.create_clients(&answers.clients));
        }
        SetupProfile::Vless => {
            let cert = answers
                .certificate
                .as_ref()
                .ok_or(InputError::Missing("domain"))?;
            phases.push(builder.prerequisites());
            phases.push(builder.firewall(answers.profile, serve_port));
            phases.push(builder.panel_install());
            phases.push(builder.certificate(cert));
            phases.push(builder.panel_setup());
        }
        SetupProfile::AddOpenVpnUsers => {
            phases.push(builder.create_clients(&answers.clients));
        }
    }

    let ovpn = &config.openvpn;
    let (artifacts, companions) = if answers.profile.creates_clients() {
        (
            answers
                .clients
                .iter()
                .map(|c| client_config_path(&ovpn.configs_dir, c))
                .collect(),
            vec![companion_path(&ovpn.configs_dir, &ovpn.relay_config)],
        )
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(Plan {
        profile: answers.profile,
        phases,
        artifacts,
        companions,
    })
}

struct Builder<'a> {
    config: &'a ProvisionConfig,
}

impl Builder<'_> {
    fn root(&self, command: impl Into<String>) -> Step {
        Step::run(command, self.config.root_dir.as_str())
    }

    fn in_repo(&self, command: impl Into<String>) -> ShellCommand {
        ShellCommand::new(command, self.config.openvpn.repo_dir.as_str())
    }

    fn cmd(&self, command: impl Into<String>) -> ShellCommand {
        ShellCommand::new(command, self.config.root_dir.as_str())
    }

    fn prerequisites(&self) -> Phase {
        Phase::new(
            "install prerequisites",
            vec![
                self.root("apt-get update"),
                self.root("apt-get upgrade -y"),
                self.root(format!("apt-get install {PREREQUISITES} -y")),
            ],
        )
    }

    fn docker_install(&self) -> Phase {
        let apt_source = format!(
            r#"echo "deb [arch=$(dpkg --print-architecture) signed-by={DOCKER_KEYRING}] https://download.docker.com/linux/ubuntu $(. /etc/os-release && echo "$VERSION_CODENAME") stable""#
        );
        Phase::new(
            "docker install",
            vec![
                Step::Literal(
                    self.cmd("sudo apt-get remove -y docker docker-engine docker.io containerd runc")
                        .tolerant(),
                ),
                self.root("sudo apt-get update"),
                self.root("sudo apt-get install ca-certificates curl gnupg -y"),
                self.root("sudo install -m 0755 -d /etc/apt/keyrings"),
                Step::Piped {
                    producer: self.cmd(format!("curl -fsSL {DOCKER_GPG_URL}")),
                    consumer: self.cmd(format!(
                        "sudo gpg --dearmor -o {DOCKER_KEYRING} --batch --yes"
                    )),
                },
                self.root(format!("sudo chmod a+r {DOCKER_KEYRING}")),
                Step::Piped {
                    producer: self.cmd(apt_source),
                    consumer: self.cmd("sudo tee /etc/apt/sources.list.d/docker.list"),
                },
                self.root("sudo apt-get update"),
                self.root(
                    "sudo apt-get install docker-ce docker-ce-cli containerd.io docker-buildx-plugin docker-compose-plugin -y",
                ),
                self.root("sudo systemctl enable docker.service"),
                self.root("sudo systemctl enable containerd.service"),
                self.root("sudo systemctl start docker.service"),
                self.root("sudo systemctl start containerd.service"),
            ],
        )
    }

    fn firewall(&self, profile: SetupProfile, serve_port: Option<u16>) -> Phase {
        let mut rules: Vec<PortRule> = firewall_rules(profile).to_vec();
        if let Some(port) = serve_port {
            let rule = PortRule::tcp(port);
            if !rules.contains(&rule) {
                rules.push(rule);
            }
        }
        let mut steps: Vec<Step> = rules
            .iter()
            .map(|rule| self.root(format!("ufw allow {}", rule.ufw_spec())))
            .collect();
        steps.push(self.root("ufw allow ssh"));
        // ufw asks before it may cut the SSH session.
        steps.push(Step::Literal(self.cmd("ufw enable").with_stdin("y\n")));
        Phase::new("open ports", steps)
    }

    fn openvpn_stack(&self) -> Phase {
        let ovpn = &self.config.openvpn;
        Phase::new(
            "clone and init openvpn",
            vec![
                Step::Literal(self.cmd(format!("rm -rf {}", ovpn.repo_dir)).tolerant()),
                self.root(format!("git clone {} {}", ovpn.repo_url, ovpn.repo_dir)),
                Step::Literal(self.in_repo("./bin/init.sh")),
                Step::Literal(self.in_repo("docker compose up -d")),
            ],
        )
        .with_revert(vec![
            Step::Literal(self.in_repo("docker compose kill")),
            self.root(format!("rm -rf {}", ovpn.repo_dir)),
        ])
    }

    fn create_clients(&self, clients: &[String]) -> Phase {
        let ovpn = &self.config.openvpn;
        let mut steps = vec![self.root(format!("mkdir -p {}", ovpn.configs_dir))];
        for client in clients {
            let path = client_config_path(&ovpn.configs_dir, client);
            steps.push(Step::Literal(self.in_repo(format!(
                r#"docker compose run --rm openvpn easyrsa build-client-full "{client}" nopass"#
            ))));
            steps.push(Step::Redirected {
                command: self.in_repo(format!(
                    r#"docker compose run --rm openvpn ovpn_getclient "{client}""#
                )),
                output: path.clone(),
            });
            steps.push(Step::RewriteRemote {
                path,
                endpoint: ovpn.endpoint.clone(),
            });
        }
        steps.push(Step::Literal(
            self.in_repo(format!("cp {} {}/", ovpn.relay_config, ovpn.configs_dir))
                .tolerant(),
        ));
        Phase::new("create clients", steps)
    }

    /// The installer reads its own prompts from stdin, so it runs from a
    /// file rather than from a pipe.
    fn panel_install(&self) -> Phase {
        Phase::new(
            "install x-ui",
            vec![
                self.root(format!(
                    "curl -fsSL {} -o {PANEL_INSTALLER}",
                    self.config.vless.installer_url
                )),
                self.root(format!("bash {PANEL_INSTALLER}")),
            ],
        )
    }

    fn certificate(&self, cert: &CertificateRequest) -> Phase {
        let CertificateRequest { domain, email } = cert;
        let certs = &self.config.vless.certs_dir;
        let acme = "~/.acme.sh/acme.sh";
        Phase::new(
            "issue certificate",
            vec![
                Step::Piped {
                    producer: self.cmd(format!("curl {}", self.config.vless.acme_url)),
                    consumer: self.cmd("sh"),
                },
                self.root(format!("{acme} --set-default-ca --server letsencrypt")),
                self.root(format!("{acme} --register-account -m {email}")),
                self.root(format!("{acme} --issue -d {domain} --standalone")),
                self.root(format!("mkdir -p {certs}")),
                self.root(format!("cp ~/.acme.sh/{domain}_ecc/* {certs}")),
                self.root(format!(
                    "{acme} --installcert -d {domain} --key-file {certs}/{domain}.key --fullchain-file {certs}/fullchain.cer"
                )),
            ],
        )
    }

    fn panel_setup(&self) -> Phase {
        let vless = &self.config.vless;
        let port = PANEL_PORT;
        Phase::new(
            "configure x-ui",
            vec![
                self.root(format!(
                    "/usr/local/x-ui/x-ui setting -username {} -password {} -port {port}",
                    vless.panel_username, vless.panel_password
                )),
                self.root(format!("ufw allow {port}")),
            ],
        )
    }
}
