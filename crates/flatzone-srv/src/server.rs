//! DNS server runner: binds UDP and/or TCP and answers from the zone engine.

use async_trait::async_trait;
use hickory_proto::op::{Header, MessageType, OpCode, ResponseCode};
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo, ServerFuture};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::engine::ZoneEngine;

/// TCP connection timeout for DNS queries.
const TCP_TIMEOUT: Duration = Duration::from_secs(30);

/// Request handler answering every query from a [`ZoneEngine`].
pub struct ZoneHandler {
    engine: Arc<ZoneEngine>,
}

impl ZoneHandler {
    pub const fn new(engine: Arc<ZoneEngine>) -> Self {
        Self { engine }
    }

    async fn send_error<R: ResponseHandler>(
        request: &Request,
        mut response_handle: R,
        code: ResponseCode,
    ) -> ResponseInfo {
        let response = MessageResponseBuilder::from_message_request(request)
            .error_msg(request.header(), code);
        response_handle.send_response(response).await.unwrap_or_else(|e| {
            error!(error = %e, "failed to write response");
            ResponseInfo::from(header_with_code(request.header(), code))
        })
    }
}

#[async_trait]
impl RequestHandler for ZoneHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        if request.message_type() != MessageType::Query || request.op_code() != OpCode::Query {
            warn!(src = %request.src(), op_code = ?request.op_code(), "unsupported request");
            return Self::send_error(request, response_handle, ResponseCode::NotImp).await;
        }

        // Exactly one question per message.
        let info = match request.request_info() {
            Ok(info) => info,
            Err(e) => {
                warn!(src = %request.src(), error = %e, "malformed request");
                return Self::send_error(request, response_handle, ResponseCode::FormErr).await;
            }
        };

        let query = info.query;
        info!(
            protocol = %info.protocol,
            src = %info.src,
            name = %query.name(),
            class = %query.query_class(),
            rtype = %query.query_type(),
            "DNS query"
        );

        let (answers, rcode) = self
            .engine
            .get_zone_rrset(&query.name().to_string(), query.query_type())
            .await;
        if rcode != ResponseCode::NoError {
            info!(src = %info.src, rcode = %rcode, "response code");
        }

        let mut header = Header::response_from_request(info.header);
        header.set_authoritative(self.engine.config().authoritative);
        header.set_response_code(rcode);

        let response = MessageResponseBuilder::from_message_request(request).build(
            header,
            answers.iter(),
            std::iter::empty(),
            std::iter::empty(),
            std::iter::empty(),
        );

        response_handle.send_response(response).await.unwrap_or_else(|e| {
            error!(error = %e, "failed to write response");
            ResponseInfo::from(header)
        })
    }
}

fn header_with_code(request_header: &Header, code: ResponseCode) -> Header {
    let mut header = Header::response_from_request(request_header);
    header.set_response_code(code);
    header
}

/// Sockets the server answers on.
#[derive(Debug, Default)]
pub struct Listeners {
    pub udp: Option<UdpSocket>,
    pub tcp: Option<TcpListener>,
}

impl Listeners {
    /// Bind the transports enabled in `config` on its listen address.
    pub async fn bind(config: &ServerConfig) -> crate::Result<Self> {
        config.validate()?;
        let mut listeners = Self::default();

        if !config.disable_udp {
            let socket = UdpSocket::bind(config.listen)
                .await
                .map_err(|e| crate::SrvError::Server(format!("UDP bind {}: {e}", config.listen)))?;
            info!(addr = %config.listen, "UDP socket bound");
            listeners.udp = Some(socket);
        }

        if !config.disable_tcp {
            let listener = TcpListener::bind(config.listen)
                .await
                .map_err(|e| crate::SrvError::Server(format!("TCP bind {}: {e}", config.listen)))?;
            info!(addr = %config.listen, "TCP listener bound");
            listeners.tcp = Some(listener);
        }

        Ok(listeners)
    }
}

/// Serve queries on `listeners` until `shutdown` resolves.
pub async fn serve<F>(engine: Arc<ZoneEngine>, listeners: Listeners, shutdown: F) -> crate::Result<()>
where
    F: Future<Output = ()> + Send,
{
    if listeners.udp.is_none() && listeners.tcp.is_none() {
        return Err(crate::SrvError::Server("no listeners to serve on".into()));
    }

    let mut server = ServerFuture::new(ZoneHandler::new(engine));
    if let Some(socket) = listeners.udp {
        server.register_socket(socket);
    }
    if let Some(listener) = listeners.tcp {
        server.register_listener(listener, TCP_TIMEOUT);
    }

    let shutdown_requested = tokio::select! {
        result = server.block_until_done() => {
            result.map_err(|e| crate::SrvError::Server(format!("server error: {e}")))?;
            false
        }
        () = shutdown => true,
    };

    if shutdown_requested {
        info!("shutting down DNS server");
        server
            .shutdown_gracefully()
            .await
            .map_err(|e| crate::SrvError::Server(format!("shutdown error: {e}")))?;
    }

    info!("DNS server stopped");
    Ok(())
}

/// Bind the configured transports and serve until `shutdown` resolves.
pub async fn run<F>(engine: Arc<ZoneEngine>, shutdown: F) -> crate::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let config = engine.config().clone();
    let listeners = Listeners::bind(&config).await?;

    info!(
        addr = %config.listen,
        database = %config.database.display(),
        upstream = %config.upstream,
        authoritative = config.authoritative,
        "flatzone DNS server running"
    );

    serve(engine, listeners, shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::aname::tests::StubUpstream;
    use hickory_proto::op::{Message, Query};
    use hickory_proto::rr::{Name, RecordType};
    use std::io::Write;
    use std::str::FromStr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    const DATABASE: &str = r#"
zone:
  example.com:
    - { host: "", type: A, ttl: 300, values: ["1.2.3.4"] }
    - { host: "", type: ANAME, ttl: 120, values: ["lb.cdn.net."] }
"#;

    struct TestServer {
        addr: std::net::SocketAddr,
        stop: oneshot::Sender<()>,
        task: tokio::task::JoinHandle<crate::Result<()>>,
        _db: tempfile::NamedTempFile,
    }

    async fn start(authoritative: bool) -> TestServer {
        let mut db = tempfile::NamedTempFile::new().unwrap();
        db.write_all(DATABASE.as_bytes()).unwrap();

        let config = ServerConfig {
            database: db.path().to_path_buf(),
            authoritative,
            ..Default::default()
        };
        let upstream = StubUpstream::default().with("lb.cdn.net.", &["198.51.100.1"]);
        let engine = Arc::new(ZoneEngine::with_upstream(config, Arc::new(upstream)));

        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let listener = TcpListener::bind(addr).await.unwrap();
        let listeners = Listeners {
            udp: Some(socket),
            tcp: Some(listener),
        };

        let (stop, stopped) = oneshot::channel();
        let task = tokio::spawn(serve(engine, listeners, async move {
            let _ = stopped.await;
        }));

        TestServer { addr, stop, task, _db: db }
    }

    fn query(name: &str, rtype: RecordType) -> Message {
        let mut message = Message::new();
        message.set_id(4242);
        message.add_query(Query::query(Name::from_str(name).unwrap(), rtype));
        message
    }

    async fn ask(addr: std::net::SocketAddr, name: &str, rtype: RecordType) -> Message {
        exchange_udp(addr, &query(name, rtype)).await
    }

    async fn exchange_tcp(addr: std::net::SocketAddr, message: &Message) -> Message {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let bytes = message.to_vec().unwrap();
        stream.write_u16(u16::try_from(bytes.len()).unwrap()).await.unwrap();
        stream.write_all(&bytes).await.unwrap();

        let read = async {
            let len = stream.read_u16().await.unwrap();
            let mut buf = vec![0u8; usize::from(len)];
            stream.read_exact(&mut buf).await.unwrap();
            buf
        };
        let buf = tokio::time::timeout(Duration::from_secs(5), read).await.unwrap();
        Message::from_vec(&buf).unwrap()
    }

    async fn exchange_udp(addr: std::net::SocketAddr, message: &Message) -> Message {
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(&message.to_vec().unwrap(), addr).await.unwrap();

        let mut buf = [0u8; 4096];
        let (len, _) = tokio::time::timeout(Duration::from_secs(5), client.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        Message::from_vec(&buf[..len]).unwrap()
    }

    #[tokio::test]
    async fn test_answers_over_udp() {
        let server = start(true).await;

        let response = ask(server.addr, "Example.COM.", RecordType::A).await;
        assert_eq!(response.id(), 4242);
        assert_eq!(response.response_code(), ResponseCode::NoError);
        assert!(response.header().authoritative());
        let answers: Vec<String> = response.answers().iter().map(|rr| rr.data().to_string()).collect();
        assert_eq!(answers, vec!["1.2.3.4", "198.51.100.1"]);

        server.stop.send(()).unwrap();
        server.task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_nxdomain_and_non_authoritative() {
        let server = start(false).await;

        let response = ask(server.addr, "example.org.", RecordType::A).await;
        assert_eq!(response.response_code(), ResponseCode::NXDomain);
        assert!(!response.header().authoritative());
        assert!(response.answers().is_empty());

        let response = ask(server.addr, "nohost.example.com.", RecordType::A).await;
        assert_eq!(response.response_code(), ResponseCode::NoError);
        assert!(response.answers().is_empty());

        server.stop.send(()).unwrap();
        server.task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_answers_over_tcp() {
        let server = start(true).await;

        let response = exchange_tcp(server.addr, &query("example.com.", RecordType::A)).await;
        assert_eq!(response.id(), 4242);
        assert_eq!(response.response_code(), ResponseCode::NoError);
        assert!(response.header().authoritative());
        let answers: Vec<String> = response.answers().iter().map(|rr| rr.data().to_string()).collect();
        assert_eq!(answers, vec!["1.2.3.4", "198.51.100.1"]);

        server.stop.send(()).unwrap();
        server.task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_two_questions_is_formerr() {
        let server = start(true).await;

        let mut message = query("example.com.", RecordType::A);
        message.add_query(Query::query(Name::from_str("example.com.").unwrap(), RecordType::AAAA));
        let response = exchange_udp(server.addr, &message).await;
        assert_eq!(response.response_code(), ResponseCode::FormErr);
        assert!(response.answers().is_empty());

        server.stop.send(()).unwrap();
        server.task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_notify_is_notimp() {
        let server = start(true).await;

        let mut message = query("example.com.", RecordType::SOA);
        message.set_op_code(OpCode::Notify);
        let response = exchange_udp(server.addr, &message).await;
        assert_eq!(response.response_code(), ResponseCode::NotImp);
        assert!(response.answers().is_empty());

        server.stop.send(()).unwrap();
        server.task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_serve_without_listeners_fails() {
        let engine = Arc::new(ZoneEngine::with_upstream(
            ServerConfig::default(),
            Arc::new(StubUpstream::default()),
        ));
        let result = serve(engine, Listeners::default(), std::future::pending()).await;
        assert!(matches!(result, Err(crate::SrvError::Server(_))));
    }

    #[tokio::test]
    async fn test_bind_rejects_no_transport() {
        let config = ServerConfig {
            disable_tcp: true,
            disable_udp: true,
            ..Default::default()
        };
        assert!(matches!(
            Listeners::bind(&config).await,
            Err(crate::SrvError::Config(_))
        ));
    }
}
