//! Petits utilitaires réseau pour la configuration.

use std::net::UdpSocket;

/// Devine l'adresse IP locale de la machine.
///
/// Ouvre un socket UDP vers un serveur DNS public pour demander au système
/// quelle interface serait utilisée pour une connexion sortante. Aucun paquet
/// n'est réellement émis (UDP est sans connexion).
///
/// Retourne `"127.0.0.1"` si aucune interface ne peut être déterminée.
pub fn guess_local_ip() -> String {
    match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => {
            if socket.connect("8.8.8.8:80").is_ok() {
                if let Ok(local_addr) = socket.local_addr() {
                    return local_addr.ip().to_string();
                }
            }
            "127.0.0.1".to_string()
        }
        Err(_) => "127.0.0.1".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    #[test]
    fn test_guess_local_ip_returns_valid_ip() {
        let ip = guess_local_ip();
        assert!(ip.parse::<IpAddr>().is_ok(), "Should return a valid IP address");
    }

    #[test]
    fn test_guess_local_ip_is_ipv4() {
        let ip = guess_local_ip();
        if let Ok(parsed) = ip.parse::<IpAddr>() {
            assert!(parsed.is_ipv4(), "Should return an IPv4 address");
        }
    }
}
