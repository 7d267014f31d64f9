use std::sync::Arc;

use campus_quest::bootstrap::app::initialize_with_configuration;
use campus_quest::bootstrap::jobs::make_rust_tls;
use campus_quest::core::Campus;
use campus_quest::servers::apis::server::{ApiServer, Launcher, Running, Stopped};
use campus_quest_configuration::Configuration;
use futures::executor::block_on;

use super::client::Client;
use super::connection_info::ConnectionInfo;

pub struct Environment<S> {
    pub config: Arc<Configuration>,
    pub campus: Arc<Campus>,
    pub server: ApiServer<S>,
}

impl Environment<Stopped> {
    pub fn new(configuration: &Arc<Configuration>) -> Self {
        let campus = initialize_with_configuration(configuration);

        let bind_to = configuration.http_api.bind_address;

        let tls = block_on(make_rust_tls(&configuration.http_api.tsl_config)).map(|tls| tls.expect("tls config failed"));

        let server = ApiServer::new(Launcher::new(bind_to, tls));

        Self {
            config: configuration.clone(),
            campus,
            server,
        }
    }

    pub fn start(self) -> Environment<Running> {
        Environment {
            config: self.config,
            campus: self.campus.clone(),
            server: self.server.start(self.campus).unwrap(),
        }
    }
}

impl Environment<Running> {
    pub fn new(configuration: &Arc<Configuration>) -> Self {
        Environment::<Stopped>::new(configuration).start()
    }

    pub async fn stop(self) -> Environment<Stopped> {
        Environment {
            config: self.config,
            campus: self.campus,
            server: self.server.stop().await.unwrap(),
        }
    }

    pub fn bind_address(&self) -> String {
        self.server.state.binding.to_string()
    }

    /// A client authenticated with the bearer `token`.
    pub fn client(&self, token: &str) -> Client {
        Client::new(ConnectionInfo::authenticated(&self.bind_address(), token))
    }

    /// A client without credentials.
    pub fn anonymous_client(&self) -> Client {
        Client::new(ConnectionInfo::anonymous(&self.bind_address()))
    }
}
