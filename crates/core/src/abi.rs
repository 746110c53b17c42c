//! Contract interfaces used across the SDK, one module per contract.
//!
//! Only the fragments the SDK actually calls or encodes are declared.

/// Plain contract account (ERC-4337 style).
pub mod account {
    use alloy_sol_types::sol;

    sol! {
        function execute(address dest, uint256 value, bytes calldata func) external;
        function isValidSignature(bytes32 hash, bytes memory signature) external view returns (bytes4 magicValue);
        function owner() external view returns (address);
    }
}

/// Safe account executing through a module-authorized call.
pub mod safe {
    use alloy_sol_types::sol;

    sol! {
        function execTransactionFromModule(address to, uint256 value, bytes calldata data, uint8 operation) external returns (bool success);
        function isOwner(address owner) external view returns (bool);
    }
}

/// Deterministic account factory.
pub mod factory {
    use alloy_sol_types::sol;

    sol! {
        function createAccount(address owner, uint256 salt) external returns (address);
        function getAddress(address owner, uint256 salt) external view returns (address);
    }
}

/// ERC-20 community token, including the mint/burn extensions.
pub mod erc20 {
    use alloy_sol_types::sol;

    sol! {
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function mint(address to, uint256 amount) external;
        function burnFrom(address account, uint256 amount) external;
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function name() external view returns (string);
        function symbol() external view returns (string);
    }
}

/// OpenZeppelin-style role-based access control.
pub mod access {
    use alloy_sol_types::sol;

    sol! {
        function hasRole(bytes32 role, address account) external view returns (bool);
        function grantRole(bytes32 role, address account) external;
        function revokeRole(bytes32 role, address account) external;
    }
}

/// Community profile registry (soulbound token URI store).
pub mod profile {
    use alloy_sol_types::sol;

    sol! {
        function set(address profile, bytes32 username, string calldata uri) external;
        function burn(address profile) external;
        function fromIdToAddress(uint256 id) external view returns (address);
        function fromAddressToId(address profile) external view returns (uint256);
        function tokenURI(uint256 tokenId) external view returns (string);
        function getFromUsername(bytes32 username) external view returns (string);
    }
}

/// Token entrypoint validating and executing sponsored user operations.
pub mod entrypoint {
    use alloy_sol_types::sol;

    sol! {
        struct UserOperation {
            address sender;
            uint256 nonce;
            bytes initCode;
            bytes callData;
            uint256 callGasLimit;
            uint256 verificationGasLimit;
            uint256 preVerificationGas;
            uint256 maxFeePerGas;
            uint256 maxPriorityFeePerGas;
            bytes paymasterAndData;
            bytes signature;
        }

        function getUserOpHash(UserOperation calldata userOp) external view returns (bytes32);
    }
}

/// Session manager module for two-factor delegations.
pub mod session_manager {
    use alloy_sol_types::sol;

    sol! {
        function request(
            bytes32 sessionSalt,
            bytes32 sessionRequestHash,
            bytes calldata signedSessionRequestHash,
            bytes calldata signedSessionHash,
            uint48 sessionExpiry,
            uint48 challengeExpiry
        ) external;

        function confirm(
            bytes32 sessionRequestHash,
            bytes32 sessionHash,
            bytes calldata signedSessionHash
        ) external;

        function revoke(address sessionOwner) external;

        function sessionRequests(address provider, bytes32 sessionRequestHash)
            external
            view
            returns (
                uint48 expiry,
                uint48 challengeExpiry,
                bytes memory signedSessionHash,
                bytes memory signedSessionRequestHash,
                bytes32 sessionSalt
            );

        function isExpired(address account, address sessionOwner) external view returns (bool);

        function getAddress(address provider, uint256 salt) external view returns (address);
    }
}

/// Card manager module for NFC card sub-accounts.
pub mod card_manager {
    use alloy_sol_types::sol;

    sol! {
        function createInstance(bytes32 instanceId) external;
        function instanceOwner(bytes32 instanceId) external view returns (address);
        function getCardAddress(bytes32 instanceId, bytes32 hashedSerial) external view returns (address);
        function callOnCard(bytes32 instanceId, bytes32 hashedSerial, address to, uint256 value, bytes calldata data) external;
    }
}
